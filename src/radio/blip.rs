//! Status Blips
//!
//! While no frame is on air, short pulses on the data line and status LED
//! tell the ground whether the GPS has a fix. The pulse repeats every
//! [`BLIP_FAST_CYCLE`] ticks with satellites in view and every
//! [`BLIP_SLOW_CYCLE`] ticks without.

use crate::board::Board;
use crate::config::{BLIP_FACTOR, BLIP_FAST_CYCLE, BLIP_ON_TICK, BLIP_SLOW_CYCLE};
use crate::types::{LedState, LineLevel};

/// Blip pattern generator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlipSignaler {
    count: u8,
}

impl BlipSignaler {
    /// Create a signaler at the start of its cycle
    #[must_use]
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Ticks since the cycle started
    #[must_use]
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Restart the cycle
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Advance by one tick, driving the line and LED on the edges
    ///
    /// Returns the LED state if this tick was an edge.
    pub fn tick<B: Board>(&mut self, satellites: u8, board: &mut B) -> Option<LedState> {
        self.count = self.count.wrapping_add(1);

        let edge = match self.count {
            BLIP_ON_TICK => {
                board.set_line(LineLevel::Mark);
                Some(LedState::On)
            }
            BLIP_FACTOR => {
                board.set_line(LineLevel::Space);
                Some(LedState::Off)
            }
            _ => None,
        };

        if let Some(led) = edge {
            board.set_status_led(led);
        }

        if (self.count == BLIP_FAST_CYCLE && satellites > 0) || self.count >= BLIP_SLOW_CYCLE {
            self.count = 0;
        }

        edge
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BlipSignaler {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Blip({})", self.count);
    }
}
