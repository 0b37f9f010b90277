//! Tank level controller firmware: main entry point.
//!
//! Two execution contexts share nothing but two lock-free channels:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  esp_timer task (every T0)          main task (background)     │
//! │                                                                │
//! │  ControlScheduler::on_tick          DisplayTask::poll          │
//! │   ├─ Controller::tick(hw)            ├─ LogDisplay (LCD text)  │
//! │   ├─ EventProducer ─── spsc ───────▶ ├─ PanelLeds              │
//! │   └─ HandshakeProducer ═══ 4 flags ═▶└─ drain_events → log     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Output, PinDriver, Pull};
use log::info;

use tankctl::adapters::hardware::HardwareAdapter;
use tankctl::adapters::log_sink::{LogDisplay, LogEventSink};
use tankctl::adapters::time::MonotonicClock;
use tankctl::app::events::{EventQueue, drain_events};
use tankctl::config::ControllerConfig;
use tankctl::controller::Controller;
use tankctl::display::DisplayFrame;
use tankctl::display::handshake::Handshake;
use tankctl::display::task::DisplayTask;
use tankctl::drivers::indicator_leds::PanelLeds;
use tankctl::drivers::pump::PumpDriver;
use tankctl::drivers::{hw_init, hw_timer};
use tankctl::pins;
use tankctl::scheduler::ControlScheduler;

/// Background loop period.  Well below the display refresh interval.
const BACKGROUND_POLL_MS: u32 = 20;

fn led(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, Output>> {
    // SAFETY: every LED GPIO in `pins` is used exactly once, here.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  tankctl v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (compiled-in, never persisted) ───────
    let config = ControllerConfig::default();
    let controller = Controller::new(&config)?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    // SAFETY: the switch GPIO is not claimed anywhere else.
    let mut auto_switch = PinDriver::input(unsafe { AnyInputPin::new(pins::AUTO_SWITCH_GPIO) })?;
    auto_switch.set_pull(Pull::Up)?;

    let [l0, l1, l2, l3, l4] = pins::LEVEL_LED_GPIOS;
    let mut leds = PanelLeds::new(
        [led(l0)?, led(l1)?, led(l2)?, led(l3)?, led(l4)?],
        led(pins::MANUAL_LED_GPIO)?,
        led(pins::AUTO_LED_GPIO)?,
    );

    // ── 4. Cross-context channels (leaked: live until reset) ──
    let handshake = Box::leak(Box::new(Handshake::new(DisplayFrame::default())));
    let queue = Box::leak(Box::new(EventQueue::new()));
    let (frames_tx, frames_rx) = handshake.split();
    let (events_tx, mut events_rx) = queue.split();

    // ── 5. Arm the control loop ───────────────────────────────
    let io = HardwareAdapter::new(auto_switch, PumpDriver::new());
    let scheduler = Box::leak(Box::new(ControlScheduler::new(
        controller, io, frames_tx, events_tx,
    )));
    hw_timer::start_control_timer(config.sample_period_us(), scheduler)?;
    info!("control loop armed (T0={} us, Manual)", config.sample_period_us());

    // ── 6. Background loop ────────────────────────────────────
    let mut display = DisplayTask::new(frames_rx, MonotonicClock::new(), config.display_refresh_ms);
    let mut lcd = LogDisplay::new();
    let mut sink = LogEventSink::new();

    loop {
        display.poll(&mut lcd, &mut leds);
        drain_events(&mut events_rx, &mut sink);
        FreeRtos::delay_ms(BACKGROUND_POLL_MS);
    }
}
