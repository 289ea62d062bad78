//! Field Formatter
//!
//! Integer to ASCII conversion for the numeric telemetry fields.
//! All routines write into caller-provided buffers; nothing allocates.

use crate::config::SENT_ID_LENGTH_MAX;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render `value` as zero-padded decimal filling all of `out`
///
/// Digits that do not fit are dropped from the high end, so callers
/// bound their values to the field width.
pub fn format_unsigned(value: u32, out: &mut [u8]) {
    let mut rest = value;
    for digit in out.iter_mut().rev() {
        *digit = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
}

/// Render `value` with the fewest decimal digits, returning the length used
pub fn format_unsigned_variable(value: u16, out: &mut [u8; SENT_ID_LENGTH_MAX]) -> usize {
    let mut scratch = [0u8; SENT_ID_LENGTH_MAX];
    let mut rest = value;
    let mut len = 0;

    loop {
        scratch[len] = b'0' + (rest % 10) as u8;
        len += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    for (dst, src) in out.iter_mut().zip(scratch[..len].iter().rev()) {
        *dst = *src;
    }
    len
}

/// Render a 16-bit value as four uppercase hex digits
#[must_use]
pub const fn format_hex16(value: u16) -> [u8; 4] {
    [
        HEX_DIGITS[((value >> 12) & 0xF) as usize],
        HEX_DIGITS[((value >> 8) & 0xF) as usize],
        HEX_DIGITS[((value >> 4) & 0xF) as usize],
        HEX_DIGITS[(value & 0xF) as usize],
    ]
}

/// Render a signed value as a sign character followed by zero-padded digits
///
/// `out[0]` receives `+` or `-`, the magnitude fills the rest.
pub fn format_signed(value: i16, out: &mut [u8]) {
    let Some((sign, digits)) = out.split_first_mut() else {
        return;
    };
    *sign = if value < 0 { b'-' } else { b'+' };
    format_unsigned(u32::from(value.unsigned_abs()), digits);
}
