//! Integration tests: ControlScheduler → Controller → ProcessIo.

use tankctl::app::events::{ControlEvent, EventConsumer, EventQueue, drain_events};
use tankctl::app::ports::{AnalogInput, AnalogOutput, DiscreteInput, SwitchInput};
use tankctl::config::{ControllerConfig, PidParameters};
use tankctl::control::mode::Mode;
use tankctl::controller::Controller;
use tankctl::display::DisplayFrame;
use tankctl::display::handshake::{Handshake, HandshakeConsumer};
use tankctl::scheduler::ControlScheduler;

use crate::mock_hw::{IoCall, MockIo, RecordingSink};

/// 2.0 V on the manual trimmer / pump output.
const TWO_VOLTS: u16 = 95 + 792;
/// 2.5 V on the pump output.
const TWO_AND_A_HALF_VOLTS: u16 = 95 + 990;

type Rig<'a> = (
    ControlScheduler<'a, MockIo>,
    HandshakeConsumer<'a, DisplayFrame>,
    EventConsumer<'a>,
);

fn rig<'a>(
    hs: &'a mut Handshake<DisplayFrame>,
    queue: &'a mut EventQueue,
    config: &ControllerConfig,
    io: MockIo,
) -> Rig<'a> {
    let (tx, rx) = hs.split();
    let (ev_tx, ev_rx) = queue.split();
    let controller = Controller::new(config).unwrap();
    (ControlScheduler::new(controller, io, tx, ev_tx), rx, ev_rx)
}

// ── Per-tick I/O sequence ─────────────────────────────────────

#[test]
fn manual_tick_reads_inputs_then_writes_then_samples_switch() {
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), MockIo::new());

    sched.on_tick();

    assert_eq!(
        sched.io().calls,
        vec![
            IoCall::ReadAnalog(AnalogInput::FluidLevel),
            IoCall::ReadAnalog(AnalogInput::OutputFlow),
            IoCall::ReadDiscrete(DiscreteInput::Setpoint),
            IoCall::ReadDiscrete(DiscreteInput::ManualVoltage),
            IoCall::Write(AnalogOutput::Pump, 95),
            IoCall::ReadSwitch(SwitchInput::AutoManual),
        ]
    );
}

#[test]
fn auto_tick_never_reads_the_manual_trimmer() {
    let io = MockIo {
        auto: true,
        ..MockIo::new()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), io);

    sched.on_tick();
    sched.io_mut().clear_calls();
    sched.on_tick();

    let calls = &sched.io().calls;
    assert!(!calls.contains(&IoCall::ReadDiscrete(DiscreteInput::ManualVoltage)));
    assert_eq!(calls.first(), Some(&IoCall::ReadAnalog(AnalogInput::FluidLevel)));
    assert_eq!(calls.last(), Some(&IoCall::ReadSwitch(SwitchInput::AutoManual)));
    assert_eq!(sched.io().pump_writes().len(), 1);
}

// ── Bumpless transfer end to end ──────────────────────────────

#[test]
fn manual_to_auto_is_bumpless_up_to_the_bias() {
    let io = MockIo {
        manual: TWO_VOLTS,
        ..MockIo::new()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), io);

    sched.on_tick();
    assert_eq!(sched.io().last_pump_code(), Some(TWO_VOLTS));

    sched.io_mut().auto = true;
    sched.on_tick(); // still Manual, raises the transfer
    assert_eq!(sched.io().last_pump_code(), Some(TWO_VOLTS));
    assert!(sched.controller().transfer_pending());

    let out = sched.on_tick();
    assert_eq!(out.mode, Mode::Auto);
    // Zero error: the PID reproduces the manual 2.0 V plus the 0.5 V bias.
    assert_eq!(out.output_code, TWO_AND_A_HALF_VOLTS);
}

#[test]
fn basic_preset_transfer_has_no_bias_step() {
    let io = MockIo {
        manual: TWO_VOLTS,
        auto: true,
        ..MockIo::new()
    };
    let config = ControllerConfig {
        pid: PidParameters::basic(),
        ..ControllerConfig::default()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &config, io);

    sched.on_tick();
    assert_eq!(sched.on_tick().output_code, TWO_VOLTS);
}

#[test]
fn steady_inputs_give_a_steady_output() {
    // Codes below code_min read as zero, so setpoint and level agree.
    let io = MockIo {
        manual: TWO_VOLTS,
        level: 10,
        setpoint: 20,
        auto: true,
        ..MockIo::new()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), io);

    for _ in 0..200 {
        sched.on_tick();
    }
    let writes = sched.io().pump_writes();
    assert!(writes[1..].iter().all(|c| *c == TWO_AND_A_HALF_VOLTS), "{writes:?}");
}

#[test]
fn every_reentry_into_auto_is_bumpless() {
    let io = MockIo {
        manual: TWO_VOLTS,
        ..MockIo::new()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), io);

    for round in 0..3 {
        sched.io_mut().auto = true;
        sched.on_tick();
        let first_auto = sched.on_tick();
        assert_eq!(first_auto.mode, Mode::Auto, "round {round}");
        assert_eq!(first_auto.output_code, TWO_AND_A_HALF_VOLTS, "round {round}");

        // Drive the integrator somewhere else before leaving Auto.
        sched.io_mut().setpoint = 95 + 2000;
        for _ in 0..20 {
            sched.on_tick();
        }
        sched.io_mut().setpoint = 0;
        sched.io_mut().auto = false;
        sched.on_tick();
        assert_eq!(sched.on_tick().output_code, TWO_VOLTS, "round {round}");
    }
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn switch_flips_are_drained_in_order() {
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, mut ev) =
        rig(&mut hs, &mut q, &ControllerConfig::default(), MockIo::new());

    let pattern = [false, true, true, false, true, false, false];
    for auto in pattern {
        sched.io_mut().auto = auto;
        sched.on_tick();
    }

    let mut sink = RecordingSink::default();
    assert_eq!(drain_events(&mut ev, &mut sink), 4);
    let transitions: Vec<(Mode, Mode, u32)> = sink
        .events
        .iter()
        .map(|e| match *e {
            ControlEvent::ModeChanged { from, to, tick } => (from, to, tick),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (Mode::Manual, Mode::Auto, 2),
            (Mode::Auto, Mode::Manual, 4),
            (Mode::Manual, Mode::Auto, 5),
            (Mode::Auto, Mode::Manual, 6),
        ]
    );
    assert_eq!(sched.dropped_events(), 0);
}

#[test]
fn out_of_range_codes_never_disturb_the_loop() {
    let io = MockIo {
        level: u16::MAX,
        flow: u16::MAX,
        setpoint: u16::MAX,
        manual: u16::MAX,
        auto: true,
        ..MockIo::new()
    };
    let (mut hs, mut q) = (Handshake::new(DisplayFrame::default()), EventQueue::new());
    let (mut sched, _rx, _ev) = rig(&mut hs, &mut q, &ControllerConfig::default(), io);

    for _ in 0..100 {
        let out = sched.on_tick();
        assert!(out.output_code <= 4055);
    }
    let s = sched.controller().signals();
    assert!(s.current_fluid_level <= 0.1001 + 1e-6);
    assert!(s.current_setpoint <= 0.1 + 1e-6);
    assert!(s.pid_control_voltage.is_finite());
}
