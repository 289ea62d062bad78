//! Hardware Abstraction Layer
//!
//! Provides safe abstractions over STM32G474 peripherals and the
//! [`TrackerBoard`] that implements [`Board`] on top of them.

pub mod adc;
pub mod gpio;
pub mod timer;

use crate::board::{Board, TickFlag};
use crate::types::{AdcChannel, LedState, LineLevel};

use self::adc::SensorAdc;
use self::gpio::{RadioData, RadioEnable, StatusLed};

/// The tracker's peripherals bundled behind [`Board`]
pub struct TrackerBoard<'d> {
    data: RadioData<'d>,
    radio: RadioEnable<'d>,
    led: StatusLed<'d>,
    adc: SensorAdc<'d>,
    tick: &'d TickFlag,
}

impl<'d> TrackerBoard<'d> {
    /// Bundle initialized peripherals
    #[must_use]
    pub fn new(
        data: RadioData<'d>,
        radio: RadioEnable<'d>,
        led: StatusLed<'d>,
        adc: SensorAdc<'d>,
        tick: &'d TickFlag,
    ) -> Self {
        Self {
            data,
            radio,
            led,
            adc,
            tick,
        }
    }
}

impl Board for TrackerBoard<'_> {
    fn set_line(&mut self, level: LineLevel) {
        self.data.set(level);
    }

    fn set_status_led(&mut self, state: LedState) {
        self.led.set(state);
    }

    fn start_carrier(&mut self) {
        self.radio.set_tx();
    }

    fn stop_carrier(&mut self) {
        self.radio.set_off();
    }

    fn read_adc_channel(&mut self, channel: AdcChannel) -> u16 {
        let reading = self.adc.read(channel);
        defmt::trace!("{}", reading);
        reading.raw()
    }

    fn tick(&mut self) -> bool {
        self.tick.take()
    }
}
