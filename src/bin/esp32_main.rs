//! ESP32-C3 SuperMini traffic light controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a 100Hz loop that:
//! - Advances the phase and activity cycles
//! - Drives the three light outputs
//! - Samples the sense inputs for defective lights
//!
//! # Hardware Setup
//!
//! Lights on GPIO5/6/7, sense lines on GPIO0/1/2 (ADC1). See
//! [`traffic_light::hal::esp32::pins`].
//!
//! # Build
//!
//! ```bash
//! cargo build --release --bin esp32_main --features esp32
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::gpio::{AnyOutputPin, OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::sys::EspError;
use log::{info, warn};
use traffic_light::hal::esp32::{pins, Esp32Clock, Esp32Sense};
use traffic_light::hal::GpioPort;
use traffic_light::traits::SenseInput;
use traffic_light::{Event, TrafficLight, TrafficLightConfig};
use std::thread;
use std::time::Duration;

/// Main loop interval in milliseconds (100Hz = 10ms)
const LOOP_INTERVAL_MS: u64 = 10;

/// Time the cycle runs before resting
const ACTIVE_MS: u32 = 60_000;

/// Rest period with all lights off
const INACTIVE_MS: u32 = 10_000;

type Output<'d> = PinDriver<'d, AnyOutputPin, esp_idf_hal::gpio::Output>;
type Sense<'d> = Box<dyn SenseInput<Error = EspError> + 'd>;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("traffic-light SuperMini controller");

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = TrafficLightConfig::standard()
        .with_activity(ACTIVE_MS, INACTIVE_MS)
        .with_test_pins([
            Some(pins::RED_SENSE),
            Some(pins::YELLOW_SENSE),
            Some(pins::GREEN_SENSE),
        ]);

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Port (light outputs + ADC sense)
    // =========================================================================
    let adc1 = AdcDriver::new(peripherals.adc1)?;
    let mut port: GpioPort<Output, Sense> = GpioPort::new();
    let gpio = |e| anyhow::anyhow!("GPIO setup failed: {:?}", e);

    port.add_output(
        pins::RED,
        PinDriver::output(peripherals.pins.gpio5.downgrade_output())?,
    )
    .map_err(gpio)?;
    port.add_output(
        pins::YELLOW,
        PinDriver::output(peripherals.pins.gpio6.downgrade_output())?,
    )
    .map_err(gpio)?;
    port.add_output(
        pins::GREEN,
        PinDriver::output(peripherals.pins.gpio7.downgrade_output())?,
    )
    .map_err(gpio)?;
    info!("[OK] Light outputs initialized (GPIO5/6/7)");

    port.add_sense(
        pins::RED_SENSE,
        Box::new(Esp32Sense::new(&adc1, peripherals.pins.gpio0)?),
    )
    .map_err(gpio)?;
    port.add_sense(
        pins::YELLOW_SENSE,
        Box::new(Esp32Sense::new(&adc1, peripherals.pins.gpio1)?),
    )
    .map_err(gpio)?;
    port.add_sense(
        pins::GREEN_SENSE,
        Box::new(Esp32Sense::new(&adc1, peripherals.pins.gpio2)?),
    )
    .map_err(gpio)?;
    info!("[OK] Sense inputs initialized (GPIO0/1/2 ADC)");

    // =========================================================================
    // Initialize Clock and Controller
    // =========================================================================
    let mut light = TrafficLight::with_config(
        port,
        Esp32Clock::new(),
        [pins::RED, pins::YELLOW, pins::GREEN],
        &config,
    )
    .map_err(gpio)?;

    light.register_event(Event::RedLightDefect, || warn!("!! RED LIGHT DEFECT !!"));
    light.register_event(Event::YellowLightDefect, || warn!("!! YELLOW LIGHT DEFECT !!"));
    light.register_event(Event::GreenLightDefect, || warn!("!! GREEN LIGHT DEFECT !!"));

    light.enable_activity_cycle();
    light.enable_cycle();

    info!("Starting control loop (100Hz)...");

    // =========================================================================
    // Main Control Loop (100Hz)
    // =========================================================================
    loop {
        if let Err(e) = light.update() {
            warn!("update failed: {:?}", e);
        }

        // Sleep until next tick
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
