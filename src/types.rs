//! Shared types used across the tracker firmware
//!
//! This module defines small domain types shared by the telemetry,
//! radio, and board layers.

/// Logical level of the radio data line
///
/// Mark is the idle/stop level, space is the start level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineLevel {
    /// Line high (mark tone)
    #[default]
    Mark,
    /// Line low (space tone)
    Space,
}

impl LineLevel {
    /// Level for a data bit (1 = mark)
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Mark
        } else {
            Self::Space
        }
    }

    /// Check if the line is high
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::Mark)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LineLevel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Mark => defmt::write!(f, "MARK"),
            Self::Space => defmt::write!(f, "SPACE"),
        }
    }
}

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// ADC input read by the tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcChannel {
    /// Battery voltage divider
    Battery,
    /// Internal die temperature sensor
    DieTemperature,
}

impl AdcChannel {
    /// Hardware channel number
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Battery => crate::config::adc::BATTERY,
            Self::DieTemperature => crate::config::adc::DIE_TEMPERATURE,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Battery => defmt::write!(f, "VBAT"),
            Self::DieTemperature => defmt::write!(f, "TEMP"),
        }
    }
}

/// Sensor readings taken right before a frame is assembled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SensorReadings {
    /// Battery voltage in millivolts
    pub battery_mv: u16,
    /// Die temperature in degrees Celsius
    pub temperature_c: i16,
}

impl SensorReadings {
    /// Create a new set of readings
    #[must_use]
    pub const fn new(battery_mv: u16, temperature_c: i16) -> Self {
        Self {
            battery_mv,
            temperature_c,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SensorReadings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}mV {}°C", self.battery_mv, self.temperature_c);
    }
}
