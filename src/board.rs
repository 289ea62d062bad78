//! Board Abstraction
//!
//! The capability set the telemetry core needs from the hardware: one data
//! line, a carrier switch, raw ADC reads, and a one-shot tick flag.
//! The core never touches registers; `hal` implements this for the STM32
//! board and the tests implement it with a recording mock.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::types::{AdcChannel, LedState, LineLevel};

/// Hardware capabilities used by the tracker
pub trait Board {
    /// Drive the radio data line
    fn set_line(&mut self, level: LineLevel);

    /// Drive the status LED (boards without one ignore this)
    fn set_status_led(&mut self, _state: LedState) {}

    /// Start continuous carrier / FSK transmission
    fn start_carrier(&mut self);

    /// Stop the carrier
    fn stop_carrier(&mut self);

    /// Take a raw reading from an ADC channel
    fn read_adc_channel(&mut self, channel: AdcChannel) -> u16;

    /// Consume the tick flag; true at most once per timer tick
    fn tick(&mut self) -> bool;
}

/// One-shot tick flag
///
/// Set from the timer context, consumed by the main loop.
#[derive(Debug, Default)]
pub struct TickFlag {
    fired: AtomicBool,
}

impl TickFlag {
    /// Create a cleared flag
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Mark that a tick occurred
    pub fn fire(&self) {
        self.fired.store(true, Ordering::Release);
    }

    /// Consume the flag, returning whether a tick had fired
    pub fn take(&self) -> bool {
        self.fired.swap(false, Ordering::AcqRel)
    }

    /// Check without consuming
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
