//! Telemetry Buffer Assembler
//!
//! Turns a GPS record and the latest sensor readings into a framed UKHAS
//! sentence. Every field is written at the offset its [`FrameLayout`]
//! dictates; nothing is scanned or searched for.

use crate::config::{POSTFIX, SENT_ID_LENGTH_MAX, VOLT_LENGTH};
use crate::telemetry::format::{
    format_hex16, format_signed, format_unsigned, format_unsigned_variable,
};
use crate::telemetry::frame::Frame;
use crate::telemetry::layout::{FrameLayout, TEMP_FIELD_LENGTH};
use crate::telemetry::record::GpsFix;
use crate::types::SensorReadings;

/// Telemetry sentence assembler
///
/// Owns the sentence counter; each call to [`Assembler::assemble`] produces
/// the next sentence.
#[derive(Clone, Debug, Default)]
pub struct Assembler {
    sentence_id: u16,
}

impl Assembler {
    /// Create an assembler whose first sentence will have id 1
    #[must_use]
    pub const fn new() -> Self {
        Self { sentence_id: 0 }
    }

    /// Create an assembler continuing after `last_id`
    #[must_use]
    pub const fn resume_after(last_id: u16) -> Self {
        Self {
            sentence_id: last_id,
        }
    }

    /// Id of the most recently assembled sentence
    #[must_use]
    pub const fn sentence_id(&self) -> u16 {
        self.sentence_id
    }

    /// Assemble the next telemetry sentence
    ///
    /// The counter wraps after 65535. Readings that do not fit their field
    /// lose their high digits.
    pub fn assemble(&mut self, fix: &GpsFix, readings: SensorReadings) -> Frame {
        self.sentence_id = self.sentence_id.wrapping_add(1);

        let mut id = [0u8; SENT_ID_LENGTH_MAX];
        let id_len = format_unsigned_variable(self.sentence_id, &mut id);

        let mut volt = [0u8; VOLT_LENGTH];
        format_unsigned(u32::from(readings.battery_mv), &mut volt);

        let mut temp = [0u8; TEMP_FIELD_LENGTH];
        format_signed(readings.temperature_c, &mut temp);

        let layout = FrameLayout::new(id_len, fix.altitude().len());
        let mut frame = Frame::new(layout);

        frame.write_field(layout.sent_id, &id[..id_len], b',');
        frame.write_field(layout.time, fix.time(), b',');
        frame.write_field(layout.lat, fix.latitude(), b',');
        frame.write_field(layout.lon, fix.longitude(), b',');
        frame.write_field(layout.alt, fix.altitude(), b',');
        frame.write_field(layout.sat, fix.satellites_field(), b',');
        frame.write_field(layout.volt, &volt, b',');
        frame.write_field(layout.temp, &temp, b'*');

        let crc = frame.compute_checksum();
        frame.write_at(layout.checksum, &format_hex16(crc));
        frame.write_at(layout.postfix, POSTFIX);
        debug_assert!(frame.is_complete(), "unwritten bytes in {frame:?}");

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix() -> GpsFix {
        GpsFix::new(b"120000", b"+5200000", b"+01300000", b"1000", b"08").unwrap()
    }

    #[test]
    fn first_sentence_is_one() {
        let mut asm = Assembler::new();
        let frame = asm.assemble(&fix(), SensorReadings::new(3300, 21));
        assert_eq!(asm.sentence_id(), 1);
        assert_eq!(frame.sentence_id_field(), b"1");
    }

    #[test]
    fn reference_sentence() {
        let mut asm = Assembler::new();
        let frame = asm.assemble(&fix(), SensorReadings::new(3300, 21));
        assert_eq!(
            frame.as_bytes(),
            b"   $$$$0x07,1,120000,+5200000,+01300000,1000,08,3300,+21*80F1\n\n"
        );
    }

    #[test]
    fn no_fill_bytes_remain() {
        let mut asm = Assembler::resume_after(9999);
        let frame = asm.assemble(&fix(), SensorReadings::new(1234, -5));
        assert!(frame.is_complete());
        assert!(frame.is_terminated());
    }

    #[test]
    fn counter_wraps() {
        let mut asm = Assembler::resume_after(u16::MAX);
        let frame = asm.assemble(&fix(), SensorReadings::new(3300, 21));
        assert_eq!(asm.sentence_id(), 0);
        assert_eq!(frame.sentence_id_field(), b"0");
    }

    #[test]
    fn negative_temperature() {
        let mut asm = Assembler::new();
        let frame = asm.assemble(&fix(), SensorReadings::new(3300, -12));
        let layout = *frame.layout();
        assert_eq!(&frame.as_bytes()[layout.temp..layout.temp + 3], b"-12");
    }
}
