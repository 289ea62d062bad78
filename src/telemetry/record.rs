//! Telemetry Record
//!
//! The GPS half of a telemetry sentence, held as the exact ASCII bytes that
//! go on air. Widths and character classes are checked once, when the record
//! is built from the NMEA collaborator's fields; the assembler then copies
//! the bytes without looking at them again.

use core::fmt;

use heapless::Vec;

use crate::config::{ALT_LENGTH_MAX, SAT_LENGTH, TIME_LENGTH};
use crate::telemetry::layout::{LAT_FIELD_LENGTH, LON_FIELD_LENGTH};

/// Telemetry field identifier, used in errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// UTC time `hhmmss`
    Time,
    /// Signed latitude
    Latitude,
    /// Signed longitude
    Longitude,
    /// Altitude in metres
    Altitude,
    /// Satellites in use
    Satellites,
}

impl Field {
    /// Name used in diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Altitude => "altitude",
            Self::Satellites => "satellites",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Field {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.name());
    }
}

/// Field validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Field does not have its declared width
    WrongLength {
        /// Offending field
        field: Field,
        /// Required width (maximum width for altitude)
        expected: usize,
        /// Width supplied
        actual: usize,
    },
    /// Non-digit where a digit is required
    InvalidCharacter {
        /// Offending field
        field: Field,
        /// Byte position within the field
        position: usize,
    },
    /// Signed field without a leading `+` or `-`
    MissingSign {
        /// Offending field
        field: Field,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} field has {} characters, expected {}",
                field.name(),
                actual,
                expected
            ),
            Self::InvalidCharacter { field, position } => {
                write!(f, "{} field has a non-digit at {}", field.name(), position)
            }
            Self::MissingSign { field } => write!(f, "{} field has no sign", field.name()),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FieldError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::WrongLength {
                field,
                expected,
                actual,
            } => defmt::write!(f, "{}: len {} != {}", field, actual, expected),
            Self::InvalidCharacter { field, position } => {
                defmt::write!(f, "{}: bad char at {}", field, position);
            }
            Self::MissingSign { field } => defmt::write!(f, "{}: no sign", field),
        }
    }
}

/// Validated GPS fields of one telemetry sentence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpsFix {
    time: [u8; TIME_LENGTH],
    lat: [u8; LAT_FIELD_LENGTH],
    lon: [u8; LON_FIELD_LENGTH],
    alt: Vec<u8, ALT_LENGTH_MAX>,
    sat: [u8; SAT_LENGTH],
}

impl GpsFix {
    /// Build a record from the NMEA collaborator's ASCII fields
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] naming the first field that is not exactly
    /// its declared width (altitude: 1 to `ALT_LENGTH_MAX` digits), is
    /// missing its sign, or holds a non-digit.
    pub fn new(
        time: &[u8],
        lat: &[u8],
        lon: &[u8],
        alt: &[u8],
        sat: &[u8],
    ) -> Result<Self, FieldError> {
        Ok(Self {
            time: fixed_digits(Field::Time, time)?,
            lat: signed_digits(Field::Latitude, lat)?,
            lon: signed_digits(Field::Longitude, lon)?,
            alt: altitude_digits(alt)?,
            sat: fixed_digits(Field::Satellites, sat)?,
        })
    }

    /// UTC time bytes
    #[must_use]
    pub const fn time(&self) -> &[u8; TIME_LENGTH] {
        &self.time
    }

    /// Latitude bytes including sign
    #[must_use]
    pub const fn latitude(&self) -> &[u8; LAT_FIELD_LENGTH] {
        &self.lat
    }

    /// Longitude bytes including sign
    #[must_use]
    pub const fn longitude(&self) -> &[u8; LON_FIELD_LENGTH] {
        &self.lon
    }

    /// Altitude digits
    #[must_use]
    pub fn altitude(&self) -> &[u8] {
        &self.alt
    }

    /// Satellite count bytes
    #[must_use]
    pub const fn satellites_field(&self) -> &[u8; SAT_LENGTH] {
        &self.sat
    }

    /// Satellite count as a number
    #[must_use]
    pub fn satellites(&self) -> u8 {
        self.sat
            .iter()
            .fold(0u8, |acc, d| acc.saturating_mul(10).saturating_add(d - b'0'))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for GpsFix {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Fix({=[u8]:a} {=[u8]:a} {=[u8]:a} {=[u8]:a}m {}sats)",
            &self.time[..],
            &self.lat[..],
            &self.lon[..],
            &self.alt[..],
            self.satellites()
        );
    }
}

fn check_digits(field: Field, bytes: &[u8], offset: usize) -> Result<(), FieldError> {
    match bytes.iter().position(|b| !b.is_ascii_digit()) {
        Some(pos) => Err(FieldError::InvalidCharacter {
            field,
            position: pos + offset,
        }),
        None => Ok(()),
    }
}

fn fixed_digits<const N: usize>(field: Field, bytes: &[u8]) -> Result<[u8; N], FieldError> {
    let out: [u8; N] = bytes.try_into().map_err(|_| FieldError::WrongLength {
        field,
        expected: N,
        actual: bytes.len(),
    })?;
    check_digits(field, &out, 0)?;
    Ok(out)
}

fn signed_digits<const N: usize>(field: Field, bytes: &[u8]) -> Result<[u8; N], FieldError> {
    let out: [u8; N] = bytes.try_into().map_err(|_| FieldError::WrongLength {
        field,
        expected: N,
        actual: bytes.len(),
    })?;
    match out.first() {
        Some(b'+' | b'-') => {}
        _ => return Err(FieldError::MissingSign { field }),
    }
    check_digits(field, &out[1..], 1)?;
    Ok(out)
}

fn altitude_digits(bytes: &[u8]) -> Result<Vec<u8, ALT_LENGTH_MAX>, FieldError> {
    let wrong_length = FieldError::WrongLength {
        field: Field::Altitude,
        expected: ALT_LENGTH_MAX,
        actual: bytes.len(),
    };
    if bytes.is_empty() {
        return Err(wrong_length);
    }
    check_digits(Field::Altitude, bytes, 0)?;
    Vec::from_slice(bytes).map_err(|()| wrong_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Result<GpsFix, FieldError> {
        GpsFix::new(b"120000", b"+5200000", b"+01300000", b"1000", b"08")
    }

    #[test]
    fn valid_fix() {
        let fix = reference().unwrap();
        assert_eq!(fix.time(), b"120000");
        assert_eq!(fix.latitude(), b"+5200000");
        assert_eq!(fix.longitude(), b"+01300000");
        assert_eq!(fix.altitude(), b"1000");
        assert_eq!(fix.satellites_field(), b"08");
        assert_eq!(fix.satellites(), 8);
    }

    #[test]
    fn short_time_rejected() {
        let err = GpsFix::new(b"12000", b"+5200000", b"+01300000", b"1000", b"08").unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongLength {
                field: Field::Time,
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn unsigned_latitude_rejected() {
        let err = GpsFix::new(b"120000", b"05200000", b"+01300000", b"1000", b"08").unwrap_err();
        assert_eq!(
            err,
            FieldError::MissingSign {
                field: Field::Latitude
            }
        );
    }

    #[test]
    fn bad_digit_position_reported() {
        let err = GpsFix::new(b"120000", b"+5200000", b"-013A0000", b"1000", b"08").unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidCharacter {
                field: Field::Longitude,
                position: 4
            }
        );
    }

    #[test]
    fn altitude_bounds() {
        assert!(GpsFix::new(b"120000", b"+5200000", b"+01300000", b"0", b"00").is_ok());
        assert!(GpsFix::new(b"120000", b"+5200000", b"+01300000", b"39000", b"00").is_ok());

        let err = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"", b"00").unwrap_err();
        assert!(matches!(err, FieldError::WrongLength { field: Field::Altitude, .. }));

        let err = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"123456", b"00").unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongLength {
                field: Field::Altitude,
                expected: 5,
                actual: 6
            }
        );
    }

    #[test]
    fn satellites_parsed() {
        let fix = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"10", b"12").unwrap();
        assert_eq!(fix.satellites(), 12);

        let fix = GpsFix::new(b"120000", b"+5200000", b"+01300000", b"10", b"00").unwrap();
        assert_eq!(fix.satellites(), 0);
    }

    #[test]
    fn error_display() {
        let err = FieldError::MissingSign {
            field: Field::Longitude,
        };
        assert_eq!(err.to_string(), "longitude field has no sign");
    }
}
