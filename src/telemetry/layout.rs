//! Frame Layout
//!
//! Byte offsets of every telemetry field inside the transmit frame.
//!
//! ```text
//!    $$$$0x07,<id>,<hhmmss>,<±lat>,<±lon>,<alt>,<ss>,<mV>,<±C>*<CRC>\n\n
//! |sync|  |name|                                              |    |
//!         ^ checksum begin                          checksum end ^
//! ```
//!
//! Only the sentence id and altitude vary in width, so a layout is a pure
//! function of those two lengths. The widest layout is evaluated at compile
//! time and sizes the frame buffer.

use crate::config::{
    ALT_LENGTH_MAX, CHECKSUM_LENGTH, LAT_LENGTH, LON_LENGTH, PAYLOAD_NAME, POSTFIX, SAT_LENGTH,
    SENTENCE_MARKER, SENT_ID_LENGTH_MAX, SYNC_PREFIX, TEMP_LENGTH, TIME_LENGTH, VOLT_LENGTH,
};

/// Offset of the first checksummed byte (start of the payload name)
pub const CHECKSUM_BEGIN: usize = SYNC_PREFIX.len() + SENTENCE_MARKER.len();

/// Offset of the sentence id, just after `<sync>$$<name>,`
pub const START_OFFSET: usize = CHECKSUM_BEGIN + PAYLOAD_NAME.len() + 1;

/// Latitude field width including its sign
pub const LAT_FIELD_LENGTH: usize = LAT_LENGTH + 1;

/// Longitude field width including its sign
pub const LON_FIELD_LENGTH: usize = LON_LENGTH + 1;

/// Temperature field width including its sign
pub const TEMP_FIELD_LENGTH: usize = TEMP_LENGTH + 1;

/// Layout of the widest possible frame
pub const MAX_LAYOUT: FrameLayout = FrameLayout::new(SENT_ID_LENGTH_MAX, ALT_LENGTH_MAX);

/// Size of the transmit buffer
pub const MAX_FRAME_LEN: usize = MAX_LAYOUT.end;

/// Number of `,` separators after the sentence id plus the `*` marker
pub const SEPARATOR_COUNT: usize = 8;

// Layout invariants, checked at build time
const _: () = {
    let min = FrameLayout::new(1, 1);
    assert!(START_OFFSET == SYNC_PREFIX.len() + SENTENCE_MARKER.len() + PAYLOAD_NAME.len() + 1);
    assert!(min.end < MAX_LAYOUT.end);
    assert!(MAX_LAYOUT.checksum_end + 1 == MAX_LAYOUT.checksum);
    assert!(MAX_LAYOUT.postfix + POSTFIX.len() == MAX_FRAME_LEN);
    assert!(MAX_LAYOUT.end - min.end == (SENT_ID_LENGTH_MAX - 1) + (ALT_LENGTH_MAX - 1));
};

/// Field offsets for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    /// Sentence id length in digits
    pub sent_id_len: usize,
    /// Altitude length in digits
    pub alt_len: usize,
    /// Sentence id offset
    pub sent_id: usize,
    /// UTC time offset
    pub time: usize,
    /// Latitude offset (sign byte)
    pub lat: usize,
    /// Longitude offset (sign byte)
    pub lon: usize,
    /// Altitude offset
    pub alt: usize,
    /// Satellite count offset
    pub sat: usize,
    /// Battery voltage offset
    pub volt: usize,
    /// Temperature offset (sign byte)
    pub temp: usize,
    /// Checksum digits offset
    pub checksum: usize,
    /// Postfix offset
    pub postfix: usize,
    /// One past the last byte of the frame
    pub end: usize,
    /// One past the last checksummed byte (the `*`)
    pub checksum_end: usize,
}

impl FrameLayout {
    /// Compute the layout for the given variable field widths
    #[must_use]
    pub const fn new(sent_id_len: usize, alt_len: usize) -> Self {
        let sent_id = START_OFFSET;
        let time = sent_id + sent_id_len + 1;
        let lat = time + TIME_LENGTH + 1;
        let lon = lat + LAT_FIELD_LENGTH + 1;
        let alt = lon + LON_FIELD_LENGTH + 1;
        let sat = alt + alt_len + 1;
        let volt = sat + SAT_LENGTH + 1;
        let temp = volt + VOLT_LENGTH + 1;
        let checksum = temp + TEMP_FIELD_LENGTH + 1;
        let postfix = checksum + CHECKSUM_LENGTH;
        let end = postfix + POSTFIX.len();

        Self {
            sent_id_len,
            alt_len,
            sent_id,
            time,
            lat,
            lon,
            alt,
            sat,
            volt,
            temp,
            checksum,
            postfix,
            end,
            checksum_end: checksum - 1,
        }
    }

    /// Total frame length
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end
    }

    /// A layout always holds the fixed text, so it is never empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Positions of the separators following each field, in frame order
    ///
    /// The last entry is the `*` checksum marker.
    #[must_use]
    pub const fn separators(&self) -> [usize; SEPARATOR_COUNT] {
        [
            self.time - 1,
            self.lat - 1,
            self.lon - 1,
            self.alt - 1,
            self.sat - 1,
            self.volt - 1,
            self.temp - 1,
            self.checksum_end,
        ]
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameLayout {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Layout(id={}, alt={}, len={})",
            self.sent_id_len,
            self.alt_len,
            self.end
        );
    }
}
