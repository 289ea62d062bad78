//! Transmit Frame and Hand-off Slot
//!
//! A [`Frame`] is one complete telemetry sentence. The [`FrameSlot`] is the
//! single point where the assembler hands a frame to the transmitter; its
//! state tag replaces a free-standing "buffer ready" flag and cursor.
//!
//! - `Idle`: no frame, the assembler may publish
//! - `Ready`: frame published, transmitter has not picked it up yet
//! - `Transmitting { cursor }`: transmitter owns the bytes

use crate::config::{POSTFIX, SYNC_PREFIX};
use crate::config::{PAYLOAD_NAME, SENTENCE_MARKER};
use crate::telemetry::checksum::checksum;
use crate::telemetry::layout::{FrameLayout, CHECKSUM_BEGIN, MAX_FRAME_LEN, START_OFFSET};

/// Byte used to pre-fill frames; any of these on air means a layout bug
pub const FILL_BYTE: u8 = b'x';

/// One assembled telemetry sentence
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_LEN],
    layout: FrameLayout,
}

impl Frame {
    /// Create a frame holding only the fixed prefix, filled with [`FILL_BYTE`]
    #[must_use]
    pub fn new(layout: FrameLayout) -> Self {
        let mut buf = [FILL_BYTE; MAX_FRAME_LEN];
        let mut pos = 0;
        for part in [SYNC_PREFIX, SENTENCE_MARKER, PAYLOAD_NAME, b",".as_slice()] {
            buf[pos..pos + part.len()].copy_from_slice(part);
            pos += part.len();
        }
        Self { buf, layout }
    }

    /// Layout this frame was written with
    #[must_use]
    pub const fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Frame length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layout.end
    }

    /// Frames always carry the prefix
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The bytes that go on air
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.layout.end]
    }

    /// Byte at `index`, if inside the frame
    #[must_use]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Copy `field` to `offset` and terminate it with `separator`
    pub(crate) fn write_field(&mut self, offset: usize, field: &[u8], separator: u8) {
        let end = offset + field.len();
        self.buf[offset..end].copy_from_slice(field);
        self.buf[end] = separator;
    }

    /// Copy raw bytes to `offset`
    pub(crate) fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Recompute the checksum over the payload range
    #[must_use]
    pub fn compute_checksum(&self) -> u16 {
        checksum(&self.buf, CHECKSUM_BEGIN, self.layout.checksum_end)
    }

    /// Checksum digits as written into the frame
    #[must_use]
    pub fn checksum_field(&self) -> &[u8] {
        &self.buf[self.layout.checksum..self.layout.postfix]
    }

    /// Sentence id digits as written into the frame
    #[must_use]
    pub fn sentence_id_field(&self) -> &[u8] {
        &self.buf[self.layout.sent_id..self.layout.sent_id + self.layout.sent_id_len]
    }

    /// Check that every byte after the fixed prefix has been written
    ///
    /// The payload name itself contains the fill byte, so only the field
    /// area from [`START_OFFSET`] on is inspected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.as_bytes()[START_OFFSET..].contains(&FILL_BYTE)
    }

    /// Check that the trailing bytes are the postfix
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        &self.buf[self.layout.postfix..self.layout.end] == POSTFIX
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.as_bytes()) {
            Ok(text) => write!(f, "Frame({text:?})"),
            Err(_) => write!(f, "Frame({:?})", self.as_bytes()),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame({=[u8]:a})", self.as_bytes());
    }
}

/// Hand-off state of the frame slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No frame pending
    #[default]
    Idle,
    /// Frame published, not yet picked up
    Ready,
    /// Frame being serialized; `cursor` is the byte in flight
    Transmitting {
        /// Index of the current byte
        cursor: usize,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Ready => defmt::write!(f, "READY"),
            Self::Transmitting { cursor } => defmt::write!(f, "TX@{}", cursor),
        }
    }
}

/// Single-producer/single-consumer slot between assembler and transmitter
#[derive(Debug, Default)]
pub struct FrameSlot {
    frame: Option<Frame>,
    state: FrameState,
}

impl FrameSlot {
    /// Create an empty slot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame: None,
            state: FrameState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> FrameState {
        self.state
    }

    /// True when no frame is pending or in flight
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, FrameState::Idle)
    }

    /// True when a frame is published or in flight (the readiness flag)
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !self.is_idle()
    }

    /// Publish a frame for transmission
    ///
    /// # Errors
    ///
    /// Returns the frame unchanged if the slot is not idle; a frame in
    /// flight is never overwritten.
    pub fn publish(&mut self, frame: Frame) -> Result<(), Frame> {
        if !self.is_idle() {
            return Err(frame);
        }
        self.frame = Some(frame);
        self.state = FrameState::Ready;
        Ok(())
    }

    /// Claim a ready frame for transmission, returning its length
    pub fn begin(&mut self) -> Option<usize> {
        match (self.state, &self.frame) {
            (FrameState::Ready, Some(frame)) => {
                self.state = FrameState::Transmitting { cursor: 0 };
                Some(frame.len())
            }
            _ => None,
        }
    }

    /// Byte at the cursor while transmitting
    #[must_use]
    pub fn current_byte(&self) -> Option<u8> {
        match (self.state, &self.frame) {
            (FrameState::Transmitting { cursor }, Some(frame)) => frame.byte(cursor),
            _ => None,
        }
    }

    /// Move the cursor to the next byte; true if bytes remain
    pub fn advance(&mut self) -> bool {
        match (self.state, &self.frame) {
            (FrameState::Transmitting { cursor }, Some(frame)) => {
                let next = cursor + 1;
                self.state = FrameState::Transmitting { cursor: next };
                next < frame.len()
            }
            _ => false,
        }
    }

    /// Release the slot after the final stop bit
    pub fn finish(&mut self) -> Option<Frame> {
        self.state = FrameState::Idle;
        self.frame.take()
    }

    /// Clear readiness from outside the transmitter
    ///
    /// The transmitter notices on its next service call, stops the carrier
    /// and returns to idle.
    pub fn abort(&mut self) -> Option<Frame> {
        self.finish()
    }

    /// Frame currently held by the slot
    #[must_use]
    pub const fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}
