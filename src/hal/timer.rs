//! Timer Abstractions
//!
//! The telemetry tick source. A [`TickClock`] wakes at [`TLM_HZ`] and sets
//! the shared [`TickFlag`]; the main loop consumes the flag through
//! [`crate::board::Board::tick`].

use embassy_time::{Duration, Instant, Ticker};

use crate::board::TickFlag;
use crate::config::TLM_HZ;

/// Periodic tick generator
pub struct TickClock {
    ticker: Ticker,
    rate_hz: u32,
    ticks: u32,
    started: Instant,
}

impl TickClock {
    /// Create a clock at the telemetry tick rate
    #[must_use]
    pub fn new() -> Self {
        Self::from_rate(TLM_HZ)
    }

    /// Create a clock from a tick rate
    #[must_use]
    pub fn from_rate(rate_hz: u32) -> Self {
        Self {
            ticker: Ticker::every(Duration::from_hz(u64::from(rate_hz))),
            rate_hz,
            ticks: 0,
            started: Instant::now(),
        }
    }

    /// Wait for the next period, then fire `flag`
    pub async fn next(&mut self, flag: &TickFlag) {
        self.ticker.next().await;
        self.ticks = self.ticks.wrapping_add(1);
        flag.fire();
    }

    /// Ticks the clock is behind wall time (missed while the loop was busy)
    #[must_use]
    pub fn lag(&self) -> u64 {
        let expected = self.started.elapsed().as_ticks() * u64::from(self.rate_hz)
            / embassy_time::TICK_HZ;
        expected.saturating_sub(u64::from(self.ticks))
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl defmt::Format for TickClock {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "TickClock({}Hz, {} ticks)", self.rate_hz, self.ticks);
    }
}
