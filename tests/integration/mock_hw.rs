//! Mock adapters for integration tests.
//!
//! [`MockIo`] serves fixed converter codes and records every port call so
//! tests can assert on the exact per-tick sequence without touching real
//! ADC/LEDC registers.  The other mocks collect what the background side
//! would have shown or logged.

use std::cell::Cell;
use std::rc::Rc;

use tankctl::app::events::ControlEvent;
use tankctl::app::ports::{
    AnalogInput, AnalogOutput, ClockPort, DiscreteInput, DisplayPort, EventSink, IndicatorPort,
    ProcessIo, SwitchInput,
};
use tankctl::control::mode::Mode;
use tankctl::display::DisplayFrame;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCall {
    ReadAnalog(AnalogInput),
    ReadDiscrete(DiscreteInput),
    ReadSwitch(SwitchInput),
    Write(AnalogOutput, u16),
}

// ── MockIo ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockIo {
    pub level: u16,
    pub flow: u16,
    pub setpoint: u16,
    pub manual: u16,
    pub auto: bool,
    pub calls: Vec<IoCall>,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every code written to the pump, oldest first.
    pub fn pump_writes(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IoCall::Write(AnalogOutput::Pump, code) => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn last_pump_code(&self) -> Option<u16> {
        self.pump_writes().last().copied()
    }

    /// Drop the call history, keep the input codes.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl ProcessIo for MockIo {
    fn read_analog_input(&mut self, channel: AnalogInput) -> u16 {
        self.calls.push(IoCall::ReadAnalog(channel));
        match channel {
            AnalogInput::FluidLevel => self.level,
            AnalogInput::OutputFlow => self.flow,
        }
    }

    fn read_discrete_input(&mut self, channel: DiscreteInput) -> u16 {
        self.calls.push(IoCall::ReadDiscrete(channel));
        match channel {
            DiscreteInput::Setpoint => self.setpoint,
            DiscreteInput::ManualVoltage => self.manual,
        }
    }

    fn read_switch(&mut self, channel: SwitchInput) -> bool {
        self.calls.push(IoCall::ReadSwitch(channel));
        self.auto
    }

    fn write_analog_output(&mut self, channel: AnalogOutput, code: u16) {
        self.calls.push(IoCall::Write(channel, code));
    }
}

// ── Background-side mocks ─────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ControlEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(*event);
    }
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<DisplayFrame>,
}

impl DisplayPort for RecordingDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        self.frames.push(*frame);
    }
}

#[derive(Debug, Default)]
pub struct RecordingLeds {
    pub level: Option<u8>,
    pub mode: Option<Mode>,
}

impl IndicatorPort for RecordingLeds {
    fn show_level(&mut self, segments: u8) {
        self.level = Some(segments);
    }

    fn show_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }
}

/// Clock the test advances by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
