//! RTTY Transmitter Tests
//!
//! Tests for bit timing, character framing, and carrier control.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test rtty_tests

use balloon_tracker::board::Board;
use balloon_tracker::config::{NUM_IDLE_BITS, TICKS_PER_BIT};
use balloon_tracker::radio::rtty::{RttyEvent, RttyState, RttyTransmitter};
use balloon_tracker::telemetry::assembler::Assembler;
use balloon_tracker::telemetry::frame::{Frame, FrameSlot};
use balloon_tracker::telemetry::record::GpsFix;
use balloon_tracker::types::{AdcChannel, LineLevel, SensorReadings};

use LineLevel::{Mark, Space};

/// Board that records every line change and carrier switch
#[derive(Default)]
struct MockBoard {
    line: Vec<LineLevel>,
    carrier: bool,
    carrier_starts: u32,
    carrier_stops: u32,
}

impl Board for MockBoard {
    fn set_line(&mut self, level: LineLevel) {
        self.line.push(level);
    }

    fn start_carrier(&mut self) {
        self.carrier = true;
        self.carrier_starts += 1;
    }

    fn stop_carrier(&mut self) {
        self.carrier = false;
        self.carrier_stops += 1;
    }

    fn read_adc_channel(&mut self, _channel: AdcChannel) -> u16 {
        0
    }

    fn tick(&mut self) -> bool {
        true
    }
}

fn frame(after_id: u16, readings: SensorReadings) -> Frame {
    let fix = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"1000", b"08").unwrap();
    Assembler::resume_after(after_id).assemble(&fix, readings)
}

fn reference_frame() -> Frame {
    frame(0, SensorReadings::new(3300, 21))
}

/// Run a frame to completion, returning the number of ticks it took
fn send(tx: &mut RttyTransmitter, slot: &mut FrameSlot, board: &mut MockBoard) -> usize {
    assert_eq!(tx.service(slot, false, board), RttyEvent::CarrierOn);
    let mut ticks = 0;
    loop {
        ticks += 1;
        if tx.service(slot, true, board) == RttyEvent::FrameDone {
            return ticks;
        }
        assert!(ticks < 100_000, "transmitter never finished");
    }
}

/// Bits of one character: start, 7 data bits LSB first, two stops
fn character(byte: u8) -> Vec<LineLevel> {
    let mut bits = vec![Space];
    bits.extend((0..7).map(|i| LineLevel::from_bit((byte >> i) & 1 != 0)));
    bits.extend([Mark, Mark]);
    bits
}

// =============================================================================
// Bit Timing Tests
// =============================================================================

#[test]
fn one_bit_per_two_ticks() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    let frame = reference_frame();
    let len = frame.len();
    slot.publish(frame).unwrap();

    let ticks = send(&mut tx, &mut slot, &mut board);
    let bits = usize::from(NUM_IDLE_BITS) + 10 * len;
    assert_eq!(board.line.len(), bits);
    assert_eq!(ticks, bits * usize::from(TICKS_PER_BIT));
}

#[test]
fn first_bit_on_second_tick() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();

    assert_eq!(tx.service(&mut slot, false, &mut board), RttyEvent::CarrierOn);
    assert!(board.carrier);
    assert_eq!(tx.service(&mut slot, true, &mut board), RttyEvent::Waiting);
    assert_eq!(tx.service(&mut slot, false, &mut board), RttyEvent::Waiting);
    assert_eq!(tx.service(&mut slot, true, &mut board), RttyEvent::Bit(Mark));
}

#[test]
fn preamble_is_idle_marks() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();
    send(&mut tx, &mut slot, &mut board);

    let idle = usize::from(NUM_IDLE_BITS);
    assert!(board.line[..idle].iter().all(|&l| l == Mark));
    assert_eq!(board.line[idle], Space, "first start bit follows the preamble");
}

#[test]
fn custom_preamble_length() {
    let mut tx = RttyTransmitter::with_idle_bits(4);
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    let frame = reference_frame();
    let len = frame.len();
    slot.publish(frame).unwrap();
    send(&mut tx, &mut slot, &mut board);

    assert_eq!(&board.line[..5], &[Mark, Mark, Mark, Mark, Space]);
    assert_eq!(board.line.len(), 4 + 10 * len);
}

// =============================================================================
// Character Framing Tests
// =============================================================================

#[test]
fn frame_bytes_serialize_in_order() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    let frame = reference_frame();
    let expected: Vec<LineLevel> = frame.as_bytes().iter().flat_map(|&b| character(b)).collect();
    slot.publish(frame).unwrap();
    send(&mut tx, &mut slot, &mut board);

    assert_eq!(&board.line[usize::from(NUM_IDLE_BITS)..], expected.as_slice());
}

#[test]
fn letter_a_bit_pattern() {
    // Sentence 10000 with these readings carries checksum A370
    let frame = frame(9999, SensorReadings::new(1234, -5));
    assert_eq!(frame.checksum_field(), b"A370");
    let offset = frame.layout().checksum;

    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(frame).unwrap();
    send(&mut tx, &mut slot, &mut board);

    let start = usize::from(NUM_IDLE_BITS) + 10 * offset;
    assert_eq!(
        &board.line[start..start + 10],
        &[Space, Mark, Space, Space, Space, Space, Space, Mark, Mark, Mark]
    );
}

#[test]
fn sync_space_bit_pattern() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();
    send(&mut tx, &mut slot, &mut board);

    let start = usize::from(NUM_IDLE_BITS);
    assert_eq!(&board.line[start..start + 10], character(b' ').as_slice());
    assert_eq!(
        &board.line[start..start + 10],
        &[Space, Space, Space, Space, Space, Space, Mark, Space, Mark, Mark]
    );
}

#[test]
fn states_walk_through_character() {
    let mut tx = RttyTransmitter::with_idle_bits(1);
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();

    tx.service(&mut slot, false, &mut board);
    assert_eq!(tx.state(), RttyState::Starting);

    let mut seen = Vec::new();
    for _ in 0..12 {
        tx.service(&mut slot, true, &mut board);
        tx.service(&mut slot, true, &mut board);
        seen.push(tx.state());
    }
    assert_eq!(
        seen,
        vec![
            RttyState::StartBit,
            RttyState::DataBits(0),
            RttyState::DataBits(1),
            RttyState::DataBits(2),
            RttyState::DataBits(3),
            RttyState::DataBits(4),
            RttyState::DataBits(5),
            RttyState::DataBits(6),
            RttyState::StopBit1,
            RttyState::StopBit2,
            RttyState::StartBit,
            RttyState::DataBits(0),
        ]
    );
}

// =============================================================================
// Carrier Control Tests
// =============================================================================

#[test]
fn carrier_spans_whole_frame() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();
    send(&mut tx, &mut slot, &mut board);

    assert_eq!(board.carrier_starts, 1);
    assert_eq!(board.carrier_stops, 1);
    assert!(!board.carrier);
    assert!(tx.is_idle());
    assert!(slot.is_idle());
    assert_eq!(board.line.last(), Some(&Mark));
}

#[test]
fn back_to_back_frames() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();

    slot.publish(reference_frame()).unwrap();
    send(&mut tx, &mut slot, &mut board);
    slot.publish(frame(1, SensorReadings::new(3300, 21))).unwrap();
    send(&mut tx, &mut slot, &mut board);

    assert_eq!(board.carrier_starts, 2);
    assert_eq!(board.carrier_stops, 2);
}

#[test]
fn no_frame_keeps_carrier_off() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    for _ in 0..100 {
        assert_eq!(tx.service(&mut slot, true, &mut board), RttyEvent::Idle);
    }
    assert_eq!(board.carrier_starts, 0);
    assert!(board.line.is_empty());
}

#[test]
fn abort_mid_character() {
    let mut tx = RttyTransmitter::new();
    let mut slot = FrameSlot::new();
    let mut board = MockBoard::default();
    slot.publish(reference_frame()).unwrap();

    tx.service(&mut slot, false, &mut board);
    for _ in 0..(2 * usize::from(NUM_IDLE_BITS) + 6) {
        tx.service(&mut slot, true, &mut board);
    }
    assert!(matches!(tx.state(), RttyState::DataBits(_)));
    let bits_before = board.line.len();

    assert!(slot.abort().is_some());
    assert_eq!(tx.service(&mut slot, true, &mut board), RttyEvent::Aborted);
    assert!(!board.carrier);
    assert!(tx.is_idle());
    assert_eq!(board.line.len(), bits_before, "no bit emitted on abort");

    // Next frame starts cleanly
    slot.publish(reference_frame()).unwrap();
    assert_eq!(tx.service(&mut slot, false, &mut board), RttyEvent::CarrierOn);
    assert_eq!(board.carrier_starts, 2);
}
