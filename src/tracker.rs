//! Tracker Scheduler
//!
//! The main-loop body. Each [`Tracker::poll`] consumes the tick flag once
//! and shares that tick between the transmitter, the blip signaler, and
//! the telemetry interval countdown.
//!
//! # Example
//!
//! ```ignore
//! let mut tracker = Tracker::new(calibration);
//! loop {
//!     if let Some(fix) = gps.try_take() {
//!         tracker.update_fix(fix);
//!     }
//!     tracker.poll(&mut board);
//! }
//! ```

use crate::board::Board;
use crate::config::TLM_INTERVAL_TICKS;
use crate::power::{BatteryVoltage, DieTemperature, TempCalibration};
use crate::radio::blip::BlipSignaler;
use crate::radio::rtty::{RttyEvent, RttyTransmitter};
use crate::telemetry::assembler::Assembler;
use crate::telemetry::frame::FrameSlot;
use crate::telemetry::record::GpsFix;
use crate::types::{AdcChannel, LedState, SensorReadings};

/// What one poll did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollReport {
    /// A timer tick was consumed
    pub tick: bool,
    /// Transmitter outcome
    pub rtty: RttyEvent,
    /// Blip edge, if the signaler ran and hit one
    pub blip: Option<LedState>,
    /// Sentence id of a frame published this poll
    pub published: Option<u16>,
}

/// Telemetry scheduler state
#[derive(Debug)]
pub struct Tracker {
    slot: FrameSlot,
    assembler: Assembler,
    rtty: RttyTransmitter,
    blips: BlipSignaler,
    calibration: TempCalibration,
    fix: Option<GpsFix>,
    satellites: u8,
    countdown: u32,
}

impl Tracker {
    /// Create a tracker; the first frame goes out one interval after start
    #[must_use]
    pub const fn new(calibration: TempCalibration) -> Self {
        Self {
            slot: FrameSlot::new(),
            assembler: Assembler::new(),
            rtty: RttyTransmitter::new(),
            blips: BlipSignaler::new(),
            calibration,
            fix: None,
            satellites: 0,
            countdown: TLM_INTERVAL_TICKS,
        }
    }

    /// Replace the transmitter (preamble length is the only knob)
    #[must_use]
    pub fn with_transmitter(mut self, rtty: RttyTransmitter) -> Self {
        self.rtty = rtty;
        self
    }

    /// Store the newest GPS record
    pub fn update_fix(&mut self, fix: GpsFix) {
        self.satellites = fix.satellites();
        self.fix = Some(fix);
    }

    /// Forget the current fix (GPS lost lock)
    pub fn clear_fix(&mut self) {
        self.satellites = 0;
        self.fix = None;
    }

    /// Satellites in view per the last fix
    #[must_use]
    pub const fn satellites(&self) -> u8 {
        self.satellites
    }

    /// Ticks until the next telemetry attempt
    #[must_use]
    pub const fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Frame hand-off slot
    #[must_use]
    pub const fn slot(&self) -> &FrameSlot {
        &self.slot
    }

    /// Mutable slot access, for aborting a frame in flight
    pub fn slot_mut(&mut self) -> &mut FrameSlot {
        &mut self.slot
    }

    /// Transmitter state
    #[must_use]
    pub const fn transmitter(&self) -> &RttyTransmitter {
        &self.rtty
    }

    /// Sentence assembler
    #[must_use]
    pub const fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    /// Run one main-loop pass
    pub fn poll<B: Board>(&mut self, board: &mut B) -> PollReport {
        let tick = board.tick();
        let was_busy = !self.rtty.is_idle() || !self.slot.is_idle();

        let rtty = self.rtty.service(&mut self.slot, tick, board);
        match rtty {
            RttyEvent::CarrierOn => {
                #[cfg(feature = "embedded")]
                defmt::debug!("carrier on, sentence {}", self.assembler.sentence_id());
            }
            RttyEvent::FrameDone => {
                #[cfg(feature = "embedded")]
                defmt::info!("sentence {} sent", self.assembler.sentence_id());
            }
            RttyEvent::Aborted => {
                #[cfg(feature = "embedded")]
                defmt::warn!("transmission aborted");
            }
            _ => {}
        }

        let idle = !was_busy && self.rtty.is_idle() && self.slot.is_idle();
        let blip = if tick && idle {
            self.blips.tick(self.satellites, board)
        } else {
            None
        };

        let published = if tick { self.count_down(board) } else { None };

        PollReport {
            tick,
            rtty,
            blip,
            published,
        }
    }

    /// Advance the telemetry interval; publish a frame when it expires
    fn count_down<B: Board>(&mut self, board: &mut B) -> Option<u16> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }

        let Some(fix) = &self.fix else {
            #[cfg(feature = "embedded")]
            defmt::debug!("no fix, skipping telemetry");
            self.countdown = TLM_INTERVAL_TICKS;
            return None;
        };

        // Hold at zero until the previous frame has left the slot
        if !self.slot.is_idle() {
            return None;
        }

        let battery = BatteryVoltage::from_adc_default(board.read_adc_channel(AdcChannel::Battery));
        let temperature = DieTemperature::from_adc(
            board.read_adc_channel(AdcChannel::DieTemperature),
            &self.calibration,
        );

        #[cfg(feature = "embedded")]
        defmt::debug!("battery {}, die {}", battery, temperature);

        let readings = SensorReadings::new(battery.millivolts(), temperature.celsius());
        let frame = self.assembler.assemble(fix, readings);

        #[cfg(feature = "embedded")]
        defmt::info!("{}", frame);

        self.countdown = TLM_INTERVAL_TICKS;
        match self.slot.publish(frame) {
            Ok(()) => {
                self.blips.reset();
                Some(self.assembler.sentence_id())
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineLevel;

    struct Bench {
        tick: bool,
    }

    impl Board for Bench {
        fn set_line(&mut self, _level: LineLevel) {}
        fn start_carrier(&mut self) {}
        fn stop_carrier(&mut self) {}
        fn read_adc_channel(&mut self, _channel: AdcChannel) -> u16 {
            100
        }
        fn tick(&mut self) -> bool {
            core::mem::take(&mut self.tick)
        }
    }

    fn tracker() -> Tracker {
        Tracker::new(TempCalibration::factory(600, 780).unwrap())
    }

    #[test]
    fn no_tick_no_countdown() {
        let mut t = tracker();
        let mut bench = Bench { tick: false };
        let report = t.poll(&mut bench);
        assert!(!report.tick);
        assert_eq!(t.countdown(), TLM_INTERVAL_TICKS);
    }

    #[test]
    fn update_fix_tracks_satellites() {
        let mut t = tracker();
        let fix = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"1000", b"08").unwrap();
        t.update_fix(fix);
        assert_eq!(t.satellites(), 8);
        t.clear_fix();
        assert_eq!(t.satellites(), 0);
    }
}
