//! Balloon Tracker Firmware Library
//!
//! This library provides the telemetry core for a high-altitude balloon
//! tracker: it assembles UKHAS telemetry sentences from GPS fixes and
//! on-board sensors and keys them out as 50-baud RTTY on the radio data
//! line. Between transmissions it blips a status pattern that tells the
//! ground whether the GPS has a fix.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │        Tracker scheduler (interval, hand-off, blips)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     TELEMETRY LAYER                          │
//! │  Field formatting  │  CRC-16  │  Layout  │  Frame assembly   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       RADIO LAYER                            │
//! │        RTTY serializer  │  Status blip signaler              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  BOARD / HAL LAYER                           │
//! │  Data line  │  Radio shutdown  │  ADC  │  Tick clock         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Tick-driven timing**: every bit boundary comes from counting ticks
//! - **Type-driven design**: GPS records are validated once, at construction
//! - **No unsafe in application code**: all register access lives in `hal`
//! - **Functional core, imperative shell**: pure logic behind the `Board` trait
//! - **Fixed memory**: frames live in fixed-size buffers, nothing allocates

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// STM32G474 pins, ADC and tick clock behind the `Board` trait.
#[cfg(feature = "embedded")]
pub mod hal;

/// Hardware capability interface used by the core
pub mod board;

/// Telemetry Sentence Encoding
///
/// Formatting, checksum, layout and frame assembly.
pub mod telemetry;

/// Radio Line Control
///
/// RTTY serializer and status blips.
pub mod radio;

/// Power and Thermal Sensing
///
/// Battery voltage and die temperature scaling.
pub mod power;

/// Main-loop scheduler
pub mod tracker;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::board::{Board, TickFlag};
    pub use crate::power::TempCalibration;
    pub use crate::telemetry::record::GpsFix;
    pub use crate::tracker::Tracker;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
