//! Integration tests: scheduler and display task on separate threads.
//!
//! The scheduler thread plays the timer interrupt; the test thread plays
//! the background loop.  Frames must arrive whole and in tick order.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;

use tankctl::adapters::sim_plant::SimulatedTank;
use tankctl::app::events::{ControlEvent, EventQueue, drain_events};
use tankctl::config::ControllerConfig;
use tankctl::control::mode::Mode;
use tankctl::controller::Controller;
use tankctl::display::DisplayFrame;
use tankctl::display::handshake::{ConsumerStep, Handshake, HandshakePhase};
use tankctl::display::task::DisplayTask;
use tankctl::scheduler::ControlScheduler;

use crate::mock_hw::{ManualClock, RecordingDisplay, RecordingLeds, RecordingSink};

/// Frames the consumer must render before the scheduler thread stops.
const FRAMES_WANTED: u32 = 40;
/// Scheduler tick on which the switch goes to Auto.  Every exchange takes
/// at least three ticks, so it always falls inside the run.
const SWITCH_TICK: u32 = 60;
/// Upper bound on ticks so a stalled consumer fails instead of hanging.
const TICK_LIMIT: u32 = 10_000_000;

#[test]
fn frames_arrive_in_tick_order_while_the_loop_runs() {
    let config = ControllerConfig::default();
    let mut hs = Handshake::new(DisplayFrame::default());
    let mut queue = EventQueue::new();
    let (tx, rx) = hs.split();
    let (ev_tx, mut ev_rx) = queue.split();

    let tank = SimulatedTank::new(config.io, config.pid.t0);
    tank.set_setpoint(0.05);
    tank.set_manual_voltage(4.0);
    let panel = tank.panel();
    let mut sched = ControlScheduler::new(Controller::new(&config).unwrap(), tank, tx, ev_tx);

    let done = AtomicBool::new(false);
    let rendered = AtomicU32::new(0);
    let mut display = RecordingDisplay::default();
    let mut leds = RecordingLeds::default();
    let mut sink = RecordingSink::default();

    thread::scope(|s| {
        s.spawn(|| {
            let mut ticks = 0u32;
            while rendered.load(Ordering::Acquire) < FRAMES_WANTED && ticks < TICK_LIMIT {
                if ticks == SWITCH_TICK {
                    panel.set_auto(true);
                }
                sched.on_tick();
                ticks += 1;
                thread::yield_now();
            }
            done.store(true, Ordering::Release);
        });

        // Refresh interval 0: request again as soon as an exchange closes.
        let mut task = DisplayTask::new(rx, ManualClock::default(), 0);
        while !done.load(Ordering::Acquire) {
            if task.poll(&mut display, &mut leds).is_some() {
                rendered.store(task.frames_rendered(), Ordering::Release);
            }
            drain_events(&mut ev_rx, &mut sink);
            thread::yield_now();
        }
        drain_events(&mut ev_rx, &mut sink);
    });

    assert!(display.frames.len() >= FRAMES_WANTED as usize, "{} frames", display.frames.len());
    assert!(display.frames.windows(2).all(|w| w[0].tick < w[1].tick));
    for frame in &display.frames {
        assert_eq!(frame.mode == Mode::Auto, frame.tick > SWITCH_TICK, "tick {}", frame.tick);
        assert!((frame.signals.current_setpoint - 0.05).abs() < 1e-4);
    }
    assert_eq!(
        sink.events.first(),
        Some(&ControlEvent::ModeChanged {
            from: Mode::Manual,
            to: Mode::Auto,
            tick: SWITCH_TICK + 1,
        })
    );
}

#[test]
fn idle_display_costs_the_tick_nothing() {
    let config = ControllerConfig::default();
    let mut hs = Handshake::new(DisplayFrame::default());
    let mut queue = EventQueue::new();
    let (tx, mut rx) = hs.split();
    let (ev_tx, _ev_rx) = queue.split();
    let tank = SimulatedTank::new(config.io, config.pid.t0);
    let mut sched = ControlScheduler::new(Controller::new(&config).unwrap(), tank, tx, ev_tx);

    for _ in 0..1_000 {
        sched.on_tick();
    }
    assert_eq!(rx.phase(), HandshakePhase::Idle);
    assert_eq!(rx.poll(false), ConsumerStep::Idle);
}
