//! Log-based adapters for the background context.
//!
//! [`LogEventSink`] writes drained [`ControlEvent`]s to the logger (UART /
//! USB-CDC in production, stderr on the host).  [`LogDisplay`] and
//! [`LogIndicators`] stand in for the LCD and the front-panel LEDs when
//! neither is fitted.

use core::fmt::Write as _;

use heapless::String;
use log::{info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::{DisplayPort, EventSink, IndicatorPort};
use crate::control::mode::Mode;
use crate::display::DisplayFrame;
use crate::display::indicators::mode_lamps;

/// Longest line [`format_frame`] produces.
pub const FRAME_LINE_CAP: usize = 128;

/// Adapter that logs every [`ControlEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::ModeChanged { from, to, tick } => {
                info!("MODE  | {:?} -> {:?} @ tick {}", from, to, tick);
            }
            ControlEvent::SaturationEntered { tick } => {
                warn!("SAT   | output above actuator limit @ tick {}", tick);
            }
            ControlEvent::SaturationCleared { tick } => {
                info!("SAT   | output back in range @ tick {}", tick);
            }
        }
    }
}

/// Render a frame as the two-column status text the panel LCD shows.
pub fn format_frame(frame: &DisplayFrame) -> String<FRAME_LINE_CAP> {
    let s = &frame.signals;
    let mut line = String::new();
    // Overflow only truncates the line.
    let _ = write!(
        line,
        "#{} {} | h={:.1}cm r={:.1}cm | u={:.2}V man={:.2}V code={} | q={:.2}cm3/s",
        frame.tick,
        match frame.mode {
            Mode::Auto => "AUTO",
            Mode::Manual => "MAN ",
        },
        s.current_fluid_level * 100.0,
        s.current_setpoint * 100.0,
        s.pid_control_voltage,
        s.manual_control_voltage,
        frame.output_code,
        s.output_flow_rate,
    );
    line
}

/// Display port that logs each rendered frame.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: String<FRAME_LINE_CAP>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the most recent frame.
    pub fn last_line(&self) -> &str {
        &self.last
    }
}

impl DisplayPort for LogDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        self.last = format_frame(frame);
        info!("LCD   | {}", self.last);
    }
}

/// Indicator port that logs LED changes only.
#[derive(Debug, Default)]
pub struct LogIndicators {
    segments: Option<u8>,
    mode: Option<Mode>,
}

impl LogIndicators {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorPort for LogIndicators {
    fn show_level(&mut self, segments: u8) {
        if self.segments != Some(segments) {
            self.segments = Some(segments);
            info!("LED   | level bar {}/5", segments);
        }
    }

    fn show_mode(&mut self, mode: Mode) {
        if self.mode != Some(mode) {
            self.mode = Some(mode);
            let (manual, auto) = mode_lamps(mode);
            info!("LED   | manual={} auto={}", u8::from(manual), u8::from(auto));
        }
    }
}
