//! Port traits: the boundary between the controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / DisplayTask (domain)
//! ```
//!
//! Driven adapters (process I/O, clock, display, indicators, event sinks)
//! implement these traits.  The domain consumes them via generics, so the
//! control law never touches hardware directly and runs unchanged against
//! the simulated tank on the host.

use crate::app::events::ControlEvent;
use crate::control::mode::Mode;
use crate::display::DisplayFrame;

// ───────────────────────────────────────────────────────────────
// Channel identities
// ───────────────────────────────────────────────────────────────

/// Analog process sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogInput {
    FluidLevel,
    OutputFlow,
}

/// Operator trimmers, sampled as plain converter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteInput {
    Setpoint,
    ManualVoltage,
}

/// Two-position switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchInput {
    AutoManual,
}

/// Analog actuator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogOutput {
    Pump,
}

// ───────────────────────────────────────────────────────────────
// Process I/O port (driven adapter: hardware ⇄ domain)
// ───────────────────────────────────────────────────────────────

/// Raw process I/O used by the periodic tick.
///
/// Every call is assumed to succeed and to return promptly: implementations
/// run inside the timer context and must never block.
pub trait ProcessIo {
    fn read_analog_input(&mut self, channel: AnalogInput) -> u16;

    fn read_discrete_input(&mut self, channel: DiscreteInput) -> u16;

    /// `true` when the switch is on.
    fn read_switch(&mut self, channel: SwitchInput) -> bool;

    fn write_analog_output(&mut self, channel: AnalogOutput, code: u16);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic elapsed-time source for the display refresh gate.
pub trait ClockPort {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Display and indicator ports (background context only)
// ───────────────────────────────────────────────────────────────

/// Renders a published controller frame.  Text layout is the adapter's job.
pub trait DisplayPort {
    fn render(&mut self, frame: &DisplayFrame);
}

/// Front-panel LEDs.
pub trait IndicatorPort {
    /// Light the first `segments` LEDs of the level bar, clear the rest.
    fn show_level(&mut self, segments: u8);

    /// Light exactly one of the Manual/Auto LEDs.
    fn show_mode(&mut self, mode: Mode);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Receives [`ControlEvent`]s drained from the tick's event queue.
pub trait EventSink {
    fn emit(&mut self, event: &ControlEvent);
}
