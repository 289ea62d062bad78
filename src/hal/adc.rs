//! ADC Driver
//!
//! Blocking single-shot reads of the battery divider and the internal die
//! temperature sensor. Both reads happen once per telemetry interval, so no
//! DMA is involved.
//!
//! The battery is read at [`BATTERY_ADC_BITS`] so that
//! [`BATTERY_MV_PER_COUNT`](crate::config::BATTERY_MV_PER_COUNT) applies.
//! The temperature sensor is read at [`TEMP_ADC_BITS`] and rescaled from
//! [`VDDA_MV`] to [`TS_CAL_VDDA_MV`] to match the factory calibration.

use embassy_stm32::adc::{
    Adc, AdcChannel as _, AnyAdcChannel, Resolution, SampleTime, Temperature,
};
use embassy_stm32::peripherals::ADC1;

use crate::config::{
    BATTERY_ADC_BITS, FACTORY_CAL_HIGH_C, TEMP_ADC_BITS, TEMP_CAL_LOW_C, TS_CAL_VDDA_MV, VDDA_MV,
};
use crate::power::{ratiometric, CalibrationError, TempCalibration};
use crate::types::AdcChannel;

/// Map a resolution in bits to the ADC setting
const fn resolution(bits: u8) -> Resolution {
    match bits {
        10 => Resolution::BITS10,
        _ => Resolution::BITS12,
    }
}

const _: () = assert!(BATTERY_ADC_BITS == 10 || BATTERY_ADC_BITS == 12);
const _: () = assert!(TEMP_ADC_BITS == 12);

/// ADC reading result
#[derive(Clone, Copy, Debug)]
pub struct AdcReading {
    /// Channel the reading came from
    channel: AdcChannel,
    /// Raw ADC value at the channel's resolution
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(channel: AdcChannel, raw: u16) -> Self {
        Self { channel, raw }
    }

    /// Get the raw value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }
}

impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({}={})", self.channel, self.raw);
    }
}

/// Sensor ADC for battery and die temperature
pub struct SensorAdc<'d> {
    adc: Adc<'d, ADC1>,
    battery: AnyAdcChannel<ADC1>,
    temperature: Temperature,
}

impl<'d> SensorAdc<'d> {
    /// Create the driver from ADC1 and the battery divider pin
    #[must_use]
    pub fn new(adc: ADC1, battery: impl embassy_stm32::adc::AdcChannel<ADC1>) -> Self {
        let mut adc = Adc::new(adc);
        // Internal sensor needs a long sampling time
        adc.set_sample_time(SampleTime::CYCLES247_5);
        let temperature = adc.enable_temperature();
        Self {
            adc,
            battery: battery.degrade_adc(),
            temperature,
        }
    }

    /// Take one reading
    ///
    /// Temperature readings come back already rescaled to the calibration
    /// supply voltage.
    pub fn read(&mut self, channel: AdcChannel) -> AdcReading {
        let raw = match channel {
            AdcChannel::Battery => {
                self.adc.set_resolution(resolution(BATTERY_ADC_BITS));
                self.adc.blocking_read(&mut self.battery)
            }
            AdcChannel::DieTemperature => {
                self.adc.set_resolution(resolution(TEMP_ADC_BITS));
                let raw = self.adc.blocking_read(&mut self.temperature);
                ratiometric(raw, VDDA_MV, TS_CAL_VDDA_MV)
            }
        };
        AdcReading::from_raw(channel, raw)
    }
}

/// TS_CAL1 address: sensor reading at 30 °C, VDDA = 3.0 V
const TS_CAL1: *const u16 = 0x1FFF_75A8 as *const u16;

/// TS_CAL2 address: sensor reading at [`FACTORY_CAL_HIGH_C`], VDDA = 3.0 V
const TS_CAL2: *const u16 = 0x1FFF_75CA as *const u16;

/// Temperature calibration from the values programmed at the factory
///
/// # Errors
///
/// Returns [`CalibrationError::DegenerateCalibration`] if system memory
/// holds identical readings (blank or damaged calibration area).
#[allow(unsafe_code)]
pub fn factory_calibration() -> Result<TempCalibration, CalibrationError> {
    // SAFETY: both addresses are in the read-only system memory of every G4
    let (cal1, cal2) = unsafe {
        (
            core::ptr::read_volatile(TS_CAL1),
            core::ptr::read_volatile(TS_CAL2),
        )
    };
    TempCalibration::new(cal1, TEMP_CAL_LOW_C, cal2, FACTORY_CAL_HIGH_C)
}
