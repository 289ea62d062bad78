//! Balloon Tracker Main Application
//!
//! Entry point for the STM32G474-based tracker firmware.
//! Initializes hardware, then runs the tracker loop off a 100 Hz tick.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use {defmt_rtt as _, panic_probe as _};

use balloon_tracker::hal::adc::{factory_calibration, SensorAdc};
use balloon_tracker::hal::gpio::{RadioData, RadioEnable, StatusLed};
use balloon_tracker::hal::timer::TickClock;
use balloon_tracker::hal::TrackerBoard;
use balloon_tracker::prelude::*;

/// Tick flag set by the clock and consumed by the tracker
static TICK: TickFlag = TickFlag::new();

/// Latest GPS fix
///
/// Signalled by the NMEA receiver task, which parses GGA sentences from the
/// GPS on USART2 (PA2/PA3) and lives outside this crate. Until a fix arrives
/// the tracker only blips and sends no frames.
pub static GPS_FIX: Signal<CriticalSectionRawMutex, GpsFix> = Signal::new();

/// Fallback calibration if the factory values are unusable
const FALLBACK_CAL: (u16, u16) = (1040, 1380);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Balloon Tracker Firmware v{}", env!("CARGO_PKG_VERSION"));

    // Initialize STM32G474 peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // PA5 = status LED, PB0 = radio SHDN, PB1 = radio FSK data
    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));
    let radio = RadioEnable::new(Output::new(p.PB0, Level::High, Speed::Low));
    let data = RadioData::new(Output::new(p.PB1, Level::High, Speed::Medium));

    // PA1 = battery divider on ADC1
    let adc = SensorAdc::new(p.ADC1, p.PA1);

    let calibration = match factory_calibration() {
        Ok(cal) => cal,
        Err(e) => {
            warn!("temperature calibration: {}, using fallback", e);
            match TempCalibration::new(
                FALLBACK_CAL.0,
                TEMP_CAL_LOW_C,
                FALLBACK_CAL.1,
                FACTORY_CAL_HIGH_C,
            ) {
                Ok(cal) => cal,
                Err(_) => defmt::panic!("fallback calibration is degenerate"),
            }
        }
    };

    let mut board = TrackerBoard::new(data, radio, led, adc, &TICK);
    let mut tracker = Tracker::new(calibration);
    let mut clock = TickClock::new();

    info!(
        "{}, {} baud, telemetry every {}s",
        clock,
        RTTY_BAUD,
        TLM_INTERVAL_S
    );

    loop {
        clock.next(&TICK).await;

        if let Some(fix) = GPS_FIX.try_take() {
            trace!("fix with {} satellites", fix.satellites());
            tracker.update_fix(fix);
        }

        let report = tracker.poll(&mut board);
        if let Some(id) = report.published {
            info!("sentence {} queued", id);
        }

        let lag = clock.lag();
        if lag > 1 {
            warn!("tracker loop {} ticks behind", lag);
        }
    }
}
