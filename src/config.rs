//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the balloon tracker.
//! Telemetry sentence layout, tick timing, and pin mappings are centralized here.

/// Payload name transmitted after the `$$` marker
pub const PAYLOAD_NAME: &[u8] = b"0x07";

/// Telemetry string prefix for receiver synchronisation
pub const SYNC_PREFIX: &[u8] = b"   $$";

/// Sentence start marker following the sync prefix
pub const SENTENCE_MARKER: &[u8] = b"$$";

/// Telemetry string postfix for the ground parser
pub const POSTFIX: &[u8] = b"\n\n";

/// Number of mark bits transmitted before the first start bit of a frame
pub const NUM_IDLE_BITS: u16 = 32;

/// Timer tick rate in Hz
pub const TLM_HZ: u32 = 100;

/// Ticks per RTTY bit (100 Hz tick / 50 baud)
pub const TICKS_PER_BIT: u8 = 2;

/// RTTY baud rate
pub const RTTY_BAUD: u32 = TLM_HZ / TICKS_PER_BIT as u32;

/// Data bits per RTTY character (7-bit ASCII)
pub const RTTY_DATA_BITS: u8 = 7;

/// Stop bits per RTTY character
pub const RTTY_STOP_BITS: u8 = 2;

/// Telemetry interval in seconds
pub const TLM_INTERVAL_S: u32 = 44;

/// Telemetry interval in ticks
pub const TLM_INTERVAL_TICKS: u32 = TLM_INTERVAL_S * TLM_HZ;

/// UTC time field width (`hhmmss`)
pub const TIME_LENGTH: usize = 6;

/// Latitude digits, excluding the sign
pub const LAT_LENGTH: usize = 7;

/// Longitude digits, excluding the sign
pub const LON_LENGTH: usize = 8;

/// Maximum altitude digits
pub const ALT_LENGTH_MAX: usize = 5;

/// Satellite count digits
pub const SAT_LENGTH: usize = 2;

/// Battery voltage digits (millivolts)
pub const VOLT_LENGTH: usize = 4;

/// Die temperature digits, excluding the sign
pub const TEMP_LENGTH: usize = 2;

/// Checksum hex digits
pub const CHECKSUM_LENGTH: usize = 4;

/// Sentence id digits for a full 16-bit counter
pub const SENT_ID_LENGTH_MAX: usize = 5;

/// Blip cycle tick that switches the indicator on
pub const BLIP_ON_TICK: u8 = 1;

/// Blip cycle tick that switches the indicator off (1:5 ratio)
pub const BLIP_FACTOR: u8 = 5;

/// Blip cycle length when satellites are visible
pub const BLIP_FAST_CYCLE: u8 = 30;

/// Blip cycle length while searching for satellites
pub const BLIP_SLOW_CYCLE: u8 = 60;

/// ADC resolution used for the battery reading
pub const BATTERY_ADC_BITS: u8 = 10;

/// ADC resolution of the factory temperature calibration values
pub const TEMP_ADC_BITS: u8 = 12;

/// Analog supply and ADC reference in millivolts
pub const VDDA_MV: u16 = 3300;

/// Battery divider ratio (battery voltage over ADC pin voltage)
pub const BATTERY_DIVIDER: u16 = 10;

/// Battery scale: millivolts per ADC count
pub const BATTERY_MV_PER_COUNT: u16 =
    ((VDDA_MV as u32 * BATTERY_DIVIDER as u32) >> BATTERY_ADC_BITS) as u16;

/// VDDA at which the factory temperature calibration was taken
pub const TS_CAL_VDDA_MV: u16 = 3000;

/// Die temperature of the low factory calibration point
pub const TEMP_CAL_LOW_C: i16 = 30;

/// Die temperature of the standard high calibration point (85 °C parts)
pub const TEMP_CAL_HIGH_C: i16 = 85;

/// Die temperature of the second factory calibration point (TS_CAL2) on the G4
pub const FACTORY_CAL_HIGH_C: i16 = 130;

// 32 mV/count keeps a two-cell pack inside the 4-digit voltage field
const _: () = assert!(BATTERY_MV_PER_COUNT == 32);

/// ADC channel assignments
pub mod adc {
    //! ADC input channel numbers

    /// Battery voltage divider input
    pub const BATTERY: u8 = 1;

    /// Internal die temperature sensor
    pub const DIE_TEMPERATURE: u8 = 16;
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the tracker board

    /// Status LED anode
    pub const LED_STATUS: &str = "PA5";

    /// Radio shutdown control (active high)
    pub const RADIO_SHDN: &str = "PB0";

    /// Radio FSK data input
    pub const RADIO_DATA: &str = "PB1";

    /// Battery voltage divider input
    pub const BATTERY_ADC: &str = "PA1";

    /// GPS UART TX
    pub const GPS_TX: &str = "PA2";

    /// GPS UART RX
    pub const GPS_RX: &str = "PA3";
}
