//! RTTY Transmitter
//!
//! Serializes a telemetry frame onto the radio data line at 50 baud:
//! 7-bit ASCII, LSB first, one start bit, two stop bits.
//!
//! # Timing
//!
//! The machine is serviced on every main-loop pass. Bit timing comes only
//! from counting ticks: every [`TICKS_PER_BIT`]th tick is a bit boundary.
//! The divider restarts when a frame is accepted, so the first bit boundary
//! is the second tick after the carrier comes on.
//!
//! ```text
//! Idle ─ready─▶ Starting ─▶ IdlePreamble ×N ─▶ StartBit ─▶ DataBits(0..6)
//!   ▲                                             ▲              │
//!   │                                             │              ▼
//!   └──────── last byte ─── StopBit2 ◀── StopBit1 ◀──────────────┘
//! ```

use crate::board::Board;
use crate::config::{NUM_IDLE_BITS, RTTY_DATA_BITS, RTTY_STOP_BITS, TICKS_PER_BIT};
use crate::telemetry::frame::{FrameSlot, FrameState};
use crate::types::LineLevel;

// StopBit1 and StopBit2 are the only stop states
const _: () = assert!(RTTY_STOP_BITS == 2);

/// Transmitter state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RttyState {
    /// Carrier off, waiting for a frame
    #[default]
    Idle,
    /// Carrier on, waiting for the first bit boundary
    Starting,
    /// Sending mark bits so the demodulator can settle
    IdlePreamble,
    /// Next bit is the start bit of the byte at the cursor
    StartBit,
    /// Next bit is data bit `n` (0 = LSB)
    DataBits(u8),
    /// Next bit is the first stop bit
    StopBit1,
    /// Next bit is the second stop bit
    StopBit2,
}

impl RttyState {
    /// Check if a frame is in flight
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RttyState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Starting => defmt::write!(f, "STARTING"),
            Self::IdlePreamble => defmt::write!(f, "PREAMBLE"),
            Self::StartBit => defmt::write!(f, "START"),
            Self::DataBits(n) => defmt::write!(f, "DATA{}", n),
            Self::StopBit1 => defmt::write!(f, "STOP1"),
            Self::StopBit2 => defmt::write!(f, "STOP2"),
        }
    }
}

/// What a service call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RttyEvent {
    /// Nothing to do
    Idle,
    /// Frame accepted, carrier switched on
    CarrierOn,
    /// Between bit boundaries
    Waiting,
    /// A bit period started with this line level
    Bit(LineLevel),
    /// Final stop bit sent, carrier switched off
    FrameDone,
    /// Slot cleared mid-frame, carrier switched off
    Aborted,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RttyEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::CarrierOn => defmt::write!(f, "CarrierOn"),
            Self::Waiting => defmt::write!(f, "Waiting"),
            Self::Bit(level) => defmt::write!(f, "Bit({})", level),
            Self::FrameDone => defmt::write!(f, "FrameDone"),
            Self::Aborted => defmt::write!(f, "Aborted"),
        }
    }
}

/// Tick-driven RTTY serializer
#[derive(Clone, Debug)]
pub struct RttyTransmitter {
    /// Current state
    state: RttyState,
    /// Remaining bits of the byte being sent
    data: u8,
    /// Mark bits sent in this preamble
    idle_sent: u16,
    /// Preamble length in bits
    idle_bits: u16,
    /// Ticks since the last bit boundary
    divider: u8,
}

impl RttyTransmitter {
    /// Create a transmitter with the configured preamble length
    #[must_use]
    pub const fn new() -> Self {
        Self::with_idle_bits(NUM_IDLE_BITS)
    }

    /// Create a transmitter with a custom preamble length (at least one bit)
    #[must_use]
    pub const fn with_idle_bits(idle_bits: u16) -> Self {
        Self {
            state: RttyState::Idle,
            data: 0,
            idle_sent: 0,
            idle_bits: if idle_bits == 0 { 1 } else { idle_bits },
            divider: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RttyState {
        self.state
    }

    /// Check if the carrier is off and no frame is in flight
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.state.is_active()
    }

    /// Preamble length in bits
    #[must_use]
    pub const fn idle_bits(&self) -> u16 {
        self.idle_bits
    }

    /// Service the transmitter once per main-loop pass
    ///
    /// `tick` is the consumed tick flag. A ready frame is accepted (and the
    /// carrier switched on) whether or not a tick fired.
    pub fn service<B: Board>(
        &mut self,
        slot: &mut FrameSlot,
        tick: bool,
        board: &mut B,
    ) -> RttyEvent {
        let in_flight = matches!(slot.state(), FrameState::Transmitting { .. });

        if self.state.is_active() && !in_flight {
            board.stop_carrier();
            self.state = RttyState::Idle;
            return RttyEvent::Aborted;
        }

        let mut event = RttyEvent::Waiting;
        if self.state == RttyState::Idle {
            if slot.begin().is_none() {
                return RttyEvent::Idle;
            }
            board.start_carrier();
            self.state = RttyState::Starting;
            self.idle_sent = 0;
            self.divider = 0;
            event = RttyEvent::CarrierOn;
        }

        if !tick {
            return event;
        }

        self.divider += 1;
        if self.divider < TICKS_PER_BIT {
            return event;
        }
        self.divider = 0;

        self.step(slot, board)
    }

    /// Emit one bit period
    fn step<B: Board>(&mut self, slot: &mut FrameSlot, board: &mut B) -> RttyEvent {
        let level = match self.state {
            RttyState::Idle => return RttyEvent::Idle,

            RttyState::Starting | RttyState::IdlePreamble => {
                self.idle_sent += 1;
                self.state = if self.idle_sent >= self.idle_bits {
                    RttyState::StartBit
                } else {
                    RttyState::IdlePreamble
                };
                LineLevel::Mark
            }

            RttyState::StartBit => {
                let byte = slot.current_byte();
                debug_assert!(byte.is_some(), "transmitter cursor outside the frame");
                #[cfg(feature = "embedded")]
                if byte.is_none() {
                    defmt::warn!("transmitter cursor outside the frame, sending NUL");
                }
                self.data = byte.unwrap_or(0);
                self.state = RttyState::DataBits(0);
                LineLevel::Space
            }

            RttyState::DataBits(n) => {
                let level = LineLevel::from_bit(self.data & 0x01 != 0);
                self.data >>= 1;
                self.state = if n + 1 >= RTTY_DATA_BITS {
                    RttyState::StopBit1
                } else {
                    RttyState::DataBits(n + 1)
                };
                level
            }

            RttyState::StopBit1 => {
                self.state = RttyState::StopBit2;
                LineLevel::Mark
            }

            RttyState::StopBit2 => {
                board.set_line(LineLevel::Mark);
                if slot.advance() {
                    self.state = RttyState::StartBit;
                    return RttyEvent::Bit(LineLevel::Mark);
                }
                slot.finish();
                board.stop_carrier();
                self.state = RttyState::Idle;
                return RttyEvent::FrameDone;
            }
        };

        board.set_line(level);
        RttyEvent::Bit(level)
    }
}

impl Default for RttyTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RttyTransmitter {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Rtty({}, preamble={})", self.state, self.idle_bits);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::telemetry::frame::Frame;
    use crate::telemetry::layout::FrameLayout;
    use crate::types::AdcChannel;

    #[derive(Default)]
    struct Bench {
        line: Vec<LineLevel>,
        carrier_on: u32,
        carrier_off: u32,
    }

    impl Board for Bench {
        fn set_line(&mut self, level: LineLevel) {
            self.line.push(level);
        }
        fn start_carrier(&mut self) {
            self.carrier_on += 1;
        }
        fn stop_carrier(&mut self) {
            self.carrier_off += 1;
        }
        fn read_adc_channel(&mut self, _channel: AdcChannel) -> u16 {
            0
        }
        fn tick(&mut self) -> bool {
            false
        }
    }

    fn ready_slot() -> FrameSlot {
        let mut slot = FrameSlot::new();
        slot.publish(Frame::new(FrameLayout::new(1, 1))).unwrap();
        slot
    }

    #[test]
    fn idle_without_frame() {
        let mut tx = RttyTransmitter::new();
        let mut slot = FrameSlot::new();
        let mut bench = Bench::default();
        assert_eq!(tx.service(&mut slot, true, &mut bench), RttyEvent::Idle);
        assert_eq!(bench.carrier_on, 0);
    }

    #[test]
    fn carrier_starts_without_tick() {
        let mut tx = RttyTransmitter::new();
        let mut slot = ready_slot();
        let mut bench = Bench::default();
        assert_eq!(tx.service(&mut slot, false, &mut bench), RttyEvent::CarrierOn);
        assert_eq!(bench.carrier_on, 1);
        assert_eq!(tx.state(), RttyState::Starting);
        assert!(bench.line.is_empty());
    }

    #[test]
    fn bit_every_second_tick() {
        let mut tx = RttyTransmitter::new();
        let mut slot = ready_slot();
        let mut bench = Bench::default();
        tx.service(&mut slot, false, &mut bench);

        assert_eq!(tx.service(&mut slot, true, &mut bench), RttyEvent::Waiting);
        assert_eq!(
            tx.service(&mut slot, true, &mut bench),
            RttyEvent::Bit(LineLevel::Mark)
        );
        assert_eq!(tx.service(&mut slot, true, &mut bench), RttyEvent::Waiting);
        assert_eq!(tx.service(&mut slot, false, &mut bench), RttyEvent::Waiting);
        assert_eq!(bench.line.len(), 1);
    }

    #[test]
    fn single_idle_bit_goes_straight_to_start() {
        let mut tx = RttyTransmitter::with_idle_bits(0);
        assert_eq!(tx.idle_bits(), 1);
        let mut slot = ready_slot();
        let mut bench = Bench::default();
        tx.service(&mut slot, true, &mut bench);
        tx.service(&mut slot, true, &mut bench);
        assert_eq!(tx.state(), RttyState::StartBit);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cursor outside the frame")]
    fn start_bit_past_frame_end_is_caught() {
        let mut tx = RttyTransmitter::with_idle_bits(1);
        let mut slot = ready_slot();
        let mut bench = Bench::default();
        tx.service(&mut slot, false, &mut bench);
        tx.service(&mut slot, true, &mut bench);
        tx.service(&mut slot, true, &mut bench);
        assert_eq!(tx.state(), RttyState::StartBit);

        // Move the cursor past the last byte behind the transmitter's back
        while slot.advance() {}
        tx.service(&mut slot, true, &mut bench);
        tx.service(&mut slot, true, &mut bench);
    }

    #[test]
    fn abort_stops_carrier() {
        let mut tx = RttyTransmitter::new();
        let mut slot = ready_slot();
        let mut bench = Bench::default();
        for _ in 0..10 {
            tx.service(&mut slot, true, &mut bench);
        }
        slot.abort();
        assert_eq!(tx.service(&mut slot, false, &mut bench), RttyEvent::Aborted);
        assert_eq!(bench.carrier_off, 1);
        assert!(tx.is_idle());
    }
}
