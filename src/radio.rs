//! Radio Line Control
//!
//! Tick-driven state machines that own the radio data line.
//! Pure logic; all pin access goes through [`crate::board::Board`].

pub mod rtty;
pub mod blip;
