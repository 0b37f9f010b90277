//! Integration tests: ControlScheduler → handshake → DisplayTask.
//!
//! Single-threaded: every step runs one tick, one display poll, then moves
//! the clock by one sample period (100 ms).

use tankctl::app::events::EventQueue;
use tankctl::config::ControllerConfig;
use tankctl::control::mode::Mode;
use tankctl::controller::Controller;
use tankctl::display::DisplayFrame;
use tankctl::display::handshake::Handshake;
use tankctl::display::task::DisplayTask;
use tankctl::scheduler::ControlScheduler;

use crate::mock_hw::{ManualClock, MockIo, RecordingDisplay, RecordingLeds};

const PERIOD_MS: u64 = 100;

/// ~6.5 cm on the level sensor.
const LEVEL_6_5_CM: u16 = 2666;

struct Bench {
    display: RecordingDisplay,
    leds: RecordingLeds,
}

/// Run `steps` tick/poll pairs and return what reached the display.
fn run(
    io: MockIo,
    refresh_ms: u32,
    steps: usize,
    mut each: impl FnMut(usize, &mut MockIo),
) -> Bench {
    let config = ControllerConfig::default();
    let mut hs = Handshake::new(DisplayFrame::default());
    let mut queue = EventQueue::new();
    let (tx, rx) = hs.split();
    let (ev_tx, _ev_rx) = queue.split();
    let mut sched = ControlScheduler::new(Controller::new(&config).unwrap(), io, tx, ev_tx);

    let clock = ManualClock::default();
    let mut task = DisplayTask::new(rx, clock.clone(), refresh_ms);
    let mut bench = Bench {
        display: RecordingDisplay::default(),
        leds: RecordingLeds::default(),
    };

    for step in 0..steps {
        each(step, sched.io_mut());
        sched.on_tick();
        task.poll(&mut bench.display, &mut bench.leds);
        clock.advance(PERIOD_MS);
    }
    assert_eq!(task.frames_rendered() as usize, bench.display.frames.len());
    bench
}

fn ticks(bench: &Bench) -> Vec<u32> {
    bench.display.frames.iter().map(|f| f.tick).collect()
}

#[test]
fn one_exchange_spans_three_ticks() {
    // Refresh shorter than an exchange: the handshake sets the pace.
    let bench = run(MockIo::new(), 250, 12, |_, _| {});
    assert_eq!(ticks(&bench), vec![3, 6, 9, 12]);
}

#[test]
fn refresh_interval_gates_new_requests() {
    let bench = run(MockIo::new(), 1_000, 30, |_, _| {});
    assert_eq!(ticks(&bench), vec![3, 13, 23]);
}

#[test]
fn leds_follow_level_and_mode() {
    let io = MockIo {
        level: LEVEL_6_5_CM,
        ..MockIo::new()
    };
    let bench = run(io, 250, 7, |step, io| io.auto = step >= 4);

    let frames = &bench.display.frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].mode, Mode::Manual);
    assert_eq!(frames[1].mode, Mode::Auto);
    assert_eq!(bench.leds.level, Some(3));
    assert_eq!(bench.leds.mode, Some(Mode::Auto));
}

#[test]
fn frame_carries_the_tick_it_was_built_on() {
    let io = MockIo {
        level: LEVEL_6_5_CM,
        manual: 95 + 792,
        ..MockIo::new()
    };
    let bench = run(io, 250, 3, |_, _| {});

    let frame = bench.display.frames[0];
    assert_eq!(frame.tick, 3);
    assert_eq!(frame.output_code, 95 + 792);
    assert!((frame.signals.current_fluid_level - 0.065).abs() < 1e-4);
    assert!((frame.signals.manual_control_voltage - 2.0).abs() < 1e-6);
}
