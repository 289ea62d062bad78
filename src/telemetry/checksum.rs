//! # CRC-16/CCITT-FALSE Implementation
//!
//! Checksum appended to UKHAS telemetry sentences.
//!
//! **Polynomial**: 0x1021 (x^16 + x^12 + x^5 + 1)
//! **Initial Value**: 0xFFFF
//! **Reflection**: none, no final XOR
//!
//! Ground decoders (dl-fldigi, habitat) expect exactly this variant.

/// CRC-16/CCITT polynomial
const CRC16_POLY: u16 = 0x1021;

/// Initial register value
const CRC16_INIT: u16 = 0xFFFF;

/// Fold one byte into the CRC register
#[must_use]
pub const fn crc16_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    let mut bit = 0;

    while bit < 8 {
        if (crc & 0x8000) != 0 {
            crc = (crc << 1) ^ CRC16_POLY;
        } else {
            crc <<= 1;
        }
        bit += 1;
    }

    crc
}

/// Calculate CRC-16/CCITT-FALSE over a whole slice
#[must_use]
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    data.iter()
        .fold(CRC16_INIT, |crc, &byte| crc16_update(crc, byte))
}

/// Calculate the checksum over `buffer[begin..end]`
///
/// An empty or out-of-bounds range checksums the bytes that exist.
#[must_use]
pub fn checksum(buffer: &[u8], begin: usize, end: usize) -> u16 {
    let end = end.min(buffer.len());
    let begin = begin.min(end);
    crc16_ccitt_false(&buffer[begin..end])
}
