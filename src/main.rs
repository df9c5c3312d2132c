//! PaddleShift Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspAdc        PinOutputs       TaskWatchdog    LogEventSink   │
//! │  (AdcSource)   (DigitalOutput)  (SafetyReset)   (EventSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  tick timer ─▶ Timebase          sample timer ─▶ SampleHandler │
//! │                      ╲               ╱                         │
//! │                       SharedState (atomics)                    │
//! │                              │                                 │
//! │  main loop ─────────▶ OutputService                            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::info;

use paddleshift::adapters::log_sink::LogEventSink;
use paddleshift::adapters::pin_outputs::PinOutputs;
use paddleshift::app::service::{OutputService, SampleHandler};
use paddleshift::config::ShifterConfig;
use paddleshift::drivers::adc::EspAdc;
use paddleshift::drivers::hw_init::{self, AdcHandle, OutputLine};
use paddleshift::drivers::hw_timer::PeriodicTimer;
use paddleshift::drivers::watchdog::TaskWatchdog;
use paddleshift::pins;
use paddleshift::safety;
use paddleshift::shared::SharedState;
use paddleshift::timebase::{ConversionPacer, Timebase, block_until_open};

/// Everything the tick, the sampler and the main loop share.
static SHARED: SharedState = SharedState::new();

/// Validate the build configuration and claim the peripherals.
fn bring_up(config: &ShifterConfig) -> paddleshift::Result<(PinOutputs<OutputLine>, AdcHandle)> {
    let timing = config.validate()?;
    info!("Config: {:?}", timing);
    let outputs = hw_init::board_outputs(config)?;
    let adc = hw_init::init_adc(pins::HORN_WIRE_ADC_CHANNEL)?;
    Ok((outputs, adc))
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PaddleShift v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration + peripherals ────────────────────────
    let config = ShifterConfig::default();
    let (mut outputs, adc_handle) = bring_up(&config)?;

    // ── 3. Outputs to power-on state ──────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = OutputService::new(&SHARED, &config);
    service.power_on(&mut outputs, &mut sink);

    // ── 4. Timebase + warm-up ─────────────────────────────────
    let mut timebase = Timebase::new(&SHARED, &config);
    let _tick = PeriodicTimer::start(
        c"tick",
        u64::from(config.tick_period_ms) * 1_000,
        move || timebase.on_tick(),
    )?;

    block_until_open(&SHARED.startup, || FreeRtos::delay_ms(10));
    service.start(&mut outputs, &mut sink);

    // ── 5. Sampling ───────────────────────────────────────────
    let mut adc = EspAdc::new(adc_handle, config.adc_buffer_capacity);
    let mut pacer = ConversionPacer::new(&SHARED, &config);
    let mut handler = SampleHandler::new(&SHARED, &config);
    let mut watchdog = TaskWatchdog::new();

    pacer.prime(&mut adc);
    let _sampler = PeriodicTimer::start(
        c"sample",
        u64::from(config.sample_period_us),
        move || {
            pacer.on_sample_timer(&mut adc);
            if !adc.take_ready() {
                return;
            }
            if let Err(fault) = handler.on_conversion_complete(&mut adc) {
                safety::shutdown(handler.monitor(), fault, &mut watchdog);
            }
        },
    )?;

    info!("System ready. Entering output loop.");

    // ── 6. Output loop ────────────────────────────────────────
    loop {
        service.poll(&mut outputs, &mut sink);
        FreeRtos::delay_ms(1);
    }
}
