//! Power and Thermal Sensing
//!
//! Scales raw ADC readings into the units carried by the telemetry
//! sentence: battery millivolts and die temperature in whole degrees.

use core::fmt;

use crate::config::{BATTERY_MV_PER_COUNT, TEMP_CAL_HIGH_C, TEMP_CAL_LOW_C};

/// Rescale a ratiometric ADC reading taken at `vdda_mv` to the value it
/// would have read at `reference_mv`
///
/// Factory calibration values are recorded at a fixed VDDA; a board running
/// from a different supply reads proportionally lower or higher counts.
#[must_use]
pub const fn ratiometric(raw: u16, vdda_mv: u16, reference_mv: u16) -> u16 {
    if reference_mv == 0 {
        return u16::MAX;
    }
    let scaled = raw as u32 * vdda_mv as u32 / reference_mv as u32;
    if scaled > u16::MAX as u32 {
        u16::MAX
    } else {
        scaled as u16
    }
}

/// Battery voltage reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryVoltage {
    /// Raw ADC reading
    raw: u16,
    /// Millivolts per ADC count (divider and reference folded in)
    mv_per_count: u16,
}

impl BatteryVoltage {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16, mv_per_count: u16) -> Self {
        Self { raw, mv_per_count }
    }

    /// Create from ADC reading with the board's default scale
    #[must_use]
    pub const fn from_adc_default(raw: u16) -> Self {
        Self::from_adc(raw, BATTERY_MV_PER_COUNT)
    }

    /// Raw ADC value
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Voltage in millivolts, saturating at `u16::MAX`
    #[must_use]
    pub const fn millivolts(&self) -> u16 {
        self.raw.saturating_mul(self.mv_per_count)
    }

    /// Check if battery is below a threshold
    #[must_use]
    pub const fn is_below(&self, threshold_mv: u16) -> bool {
        self.millivolts() < threshold_mv
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        let mv = self.millivolts();
        defmt::write!(f, "{}.{:03}V", mv / 1000, mv % 1000);
    }
}

/// Calibration error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    /// Both calibration points read the same raw value
    DegenerateCalibration,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateCalibration => write!(f, "calibration points are identical"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CalibrationError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DegenerateCalibration => defmt::write!(f, "DegenerateCalibration"),
        }
    }
}

/// Two-point factory calibration of the die temperature sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempCalibration {
    raw_low: u16,
    raw_high: u16,
    celsius_low: i16,
    celsius_high: i16,
}

impl TempCalibration {
    /// Create a calibration from two raw readings at known temperatures
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DegenerateCalibration`] if both readings
    /// are equal, which would make the slope undefined.
    pub const fn new(
        raw_low: u16,
        celsius_low: i16,
        raw_high: u16,
        celsius_high: i16,
    ) -> Result<Self, CalibrationError> {
        if raw_low == raw_high {
            return Err(CalibrationError::DegenerateCalibration);
        }
        Ok(Self {
            raw_low,
            raw_high,
            celsius_low,
            celsius_high,
        })
    }

    /// Calibration from readings taken at the standard 30 °C and 85 °C points
    ///
    /// # Errors
    ///
    /// See [`TempCalibration::new`].
    pub const fn factory(raw_30c: u16, raw_85c: u16) -> Result<Self, CalibrationError> {
        Self::new(raw_30c, TEMP_CAL_LOW_C, raw_85c, TEMP_CAL_HIGH_C)
    }

    /// Interpolate a raw reading to whole degrees Celsius
    #[must_use]
    pub fn celsius(&self, raw: u16) -> i16 {
        let dt = i32::from(self.celsius_high) - i32::from(self.celsius_low);
        let dr = i32::from(self.raw_high) - i32::from(self.raw_low);
        let offset = i32::from(raw) - i32::from(self.raw_low);
        let c = offset * dt / dr + i32::from(self.celsius_low);
        c.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }
}

/// Die temperature reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DieTemperature {
    celsius: i16,
}

impl DieTemperature {
    /// Create from a raw ADC reading
    #[must_use]
    pub fn from_adc(raw: u16, calibration: &TempCalibration) -> Self {
        Self {
            celsius: calibration.celsius(raw),
        }
    }

    /// Create from whole degrees
    #[must_use]
    pub const fn from_celsius(celsius: i16) -> Self {
        Self { celsius }
    }

    /// Temperature in whole degrees Celsius
    #[must_use]
    pub const fn celsius(&self) -> i16 {
        self.celsius
    }

    /// Check if below freezing
    #[must_use]
    pub const fn is_below_freezing(&self) -> bool {
        self.celsius < 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DieTemperature {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}°C", self.celsius);
    }
}
