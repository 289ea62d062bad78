//! Telemetry Sentence Encoding
//!
//! Builds the UKHAS telemetry sentence transmitted over RTTY:
//! - Field formatting (decimal, signed, hex)
//! - CRC-16 checksum
//! - Compile-time frame layout
//! - GPS record validation
//! - Frame assembly and hand-off to the transmitter

pub mod format;
pub mod checksum;
pub mod layout;
pub mod record;
pub mod frame;
pub mod assembler;
