//! GPIO Abstractions
//!
//! Type-safe wrappers for the tracker's output pins.

use embassy_stm32::gpio::Output;

use crate::types::{LedState, LineLevel};

/// Status LED driver
pub struct StatusLed<'d> {
    pin: Output<'d>,
}

impl<'d> StatusLed<'d> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        let mut led = Self { pin };
        led.set(LedState::Off);
        led
    }

    /// Drive the LED
    pub fn set(&mut self, state: LedState) {
        match state {
            LedState::On => self.pin.set_high(),
            LedState::Off => self.pin.set_low(),
        }
    }
}

/// Radio FSK data input
///
/// High selects the mark tone, low the space tone.
pub struct RadioData<'d> {
    pin: Output<'d>,
}

impl<'d> RadioData<'d> {
    /// Create the data line (parked at mark)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        let mut line = Self { pin };
        line.set(LineLevel::Mark);
        line
    }

    /// Drive the line
    pub fn set(&mut self, level: LineLevel) {
        if level.is_high() {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// Radio shutdown control
///
/// The transmitter is held in shutdown (pin high) whenever the carrier is
/// off; releasing shutdown keys the carrier.
pub struct RadioEnable<'d> {
    shdn: Output<'d>,
}

impl<'d> RadioEnable<'d> {
    /// Create the control (starts in shutdown)
    #[must_use]
    pub fn new(shdn: Output<'d>) -> Self {
        let mut radio = Self { shdn };
        radio.set_off();
        radio
    }

    /// Release shutdown and key the carrier
    pub fn set_tx(&mut self) {
        self.shdn.set_low();
    }

    /// Put the radio back into shutdown
    pub fn set_off(&mut self) {
        self.shdn.set_high();
    }
}
