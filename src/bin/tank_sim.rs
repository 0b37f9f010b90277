//! Host simulator: the firmware's control loop against a simulated tank.
//!
//! Wiring mirrors `main.rs`; the control timer is a thread and the panel is
//! scripted: the pump runs on the manual trimmer for a few seconds, then
//! the switch goes to Auto and the PID takes the level to the set-point.
//!
//! ```text
//! tank-sim [--config FILE] [--setpoint CM] [--manual V] [--seconds S] [--speed X]
//! tank-sim --dump-config
//! ```
//!
//! Log filter comes from `TANKCTL_LOG` (`env_logger` syntax, default `info`).

#[cfg(target_os = "espidf")]
fn main() {}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    sim::run()
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use std::time::Duration;

    use anyhow::{Context, Result, anyhow, bail};
    use env_logger::Env;
    use log::{info, warn};

    use tankctl::adapters::log_sink::{LogDisplay, LogEventSink, LogIndicators};
    use tankctl::adapters::sim_plant::SimulatedTank;
    use tankctl::adapters::time::MonotonicClock;
    use tankctl::app::events::{EventQueue, drain_events};
    use tankctl::config::ControllerConfig;
    use tankctl::controller::Controller;
    use tankctl::display::DisplayFrame;
    use tankctl::display::handshake::Handshake;
    use tankctl::display::task::DisplayTask;
    use tankctl::drivers::hw_timer;
    use tankctl::scheduler::ControlScheduler;

    /// Simulated seconds spent in Manual before the switch flips.
    const MANUAL_SECONDS: f32 = 5.0;

    /// Environment variable holding the log filter (`env_logger` syntax).
    const LOG_ENV: &str = "TANKCTL_LOG";

    fn logger(env_var: &str) -> env_logger::Builder {
        let mut builder = env_logger::Builder::from_env(Env::default().filter_or(env_var, "info"));
        builder.format_timestamp_millis();
        builder
    }

    fn parse_config(text: &str, origin: &str) -> Result<ControllerConfig> {
        serde_json::from_str(text).with_context(|| format!("parsing {origin}"))
    }

    struct Options {
        config: ControllerConfig,
        setpoint_m: f32,
        manual_v: f32,
        seconds: f32,
        speed: f32,
        dump_config: bool,
    }

    fn parse_args() -> Result<Options> {
        let mut opts = Options {
            config: ControllerConfig::default(),
            setpoint_m: 0.05,
            manual_v: 2.0,
            seconds: 3_000.0,
            speed: 500.0,
            dump_config: false,
        };

        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            if flag == "--dump-config" {
                opts.dump_config = true;
                continue;
            }
            let value = args.next().ok_or_else(|| anyhow!("{flag} needs a value"))?;
            let number = || -> Result<f32> {
                value.parse::<f32>().with_context(|| format!("{flag}: not a number: {value}"))
            };
            match flag.as_str() {
                "--config" => {
                    let text = std::fs::read_to_string(&value)
                        .with_context(|| format!("reading {value}"))?;
                    opts.config = parse_config(&text, &value)?;
                }
                "--setpoint" => opts.setpoint_m = number()? / 100.0,
                "--manual" => opts.manual_v = number()?,
                "--seconds" => opts.seconds = number()?,
                "--speed" => opts.speed = number()?,
                other => bail!("unknown option {other}"),
            }
        }

        if opts.speed.is_nan() || opts.speed <= 0.0 {
            bail!("--speed must be positive");
        }
        Ok(opts)
    }

    pub fn run() -> Result<()> {
        logger(LOG_ENV).try_init().context("installing logger")?;
        let opts = parse_args()?;
        let config = opts.config;

        if opts.dump_config {
            let json = serde_json::to_string_pretty(&config).context("serialising config")?;
            println!("{json}");
            return Ok(());
        }

        let controller = Controller::new(&config)?;

        let tank = SimulatedTank::new(config.io, config.pid.t0);
        tank.set_setpoint(opts.setpoint_m);
        tank.set_manual_voltage(opts.manual_v);
        let panel = tank.panel();

        let handshake = Box::leak(Box::new(Handshake::new(DisplayFrame::default())));
        let queue = Box::leak(Box::new(EventQueue::new()));
        let (frames_tx, frames_rx) = handshake.split();
        let (events_tx, mut events_rx) = queue.split();

        let scheduler = Box::leak(Box::new(ControlScheduler::new(
            controller, tank, frames_tx, events_tx,
        )));
        let period_us = ((config.sample_period_us() as f64) / f64::from(opts.speed)).max(1.0) as u64;
        hw_timer::start_control_timer(period_us, scheduler)?;
        info!(
            "sim: setpoint {:.1} cm, manual {:.2} V for {} s, then Auto; {}x real time",
            opts.setpoint_m * 100.0,
            opts.manual_v,
            MANUAL_SECONDS,
            opts.speed
        );

        let mut display = DisplayTask::new(frames_rx, MonotonicClock::new(), config.display_refresh_ms);
        let mut lcd = LogDisplay::new();
        let mut leds = LogIndicators::new();
        let mut sink = LogEventSink::new();

        let manual_ticks = (MANUAL_SECONDS / config.pid.t0) as u32;
        let total_ticks = (opts.seconds / config.pid.t0) as u32;
        let mut last = DisplayFrame::default();

        while last.tick < total_ticks {
            if let Some(frame) = display.poll(&mut lcd, &mut leds) {
                last = frame;
                if frame.tick >= manual_ticks && !panel.is_auto() {
                    panel.set_auto(true);
                }
            }
            drain_events(&mut events_rx, &mut sink);
            std::thread::sleep(Duration::from_millis(5));
        }
        hw_timer::stop_control_timer();
        drain_events(&mut events_rx, &mut sink);

        let error_cm = (last.signals.current_setpoint - last.signals.current_fluid_level) * 100.0;
        info!(
            "sim: done after {} ticks, level {:.2} cm, error {:+.2} cm",
            last.tick,
            last.signals.current_fluid_level * 100.0,
            error_cm
        );
        if error_cm.abs() > 0.2 {
            warn!("sim: level not settled; try a longer --seconds");
        }
        Ok(())
    }

}
