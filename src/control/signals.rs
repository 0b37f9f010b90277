//! Process variables with one tick of history.
//!
//! Each `record_*` method shifts the current value into its `old_*` twin
//! before overwriting it, so `old_*` always holds exactly what the current
//! field held one tick earlier.  They are the only way to update a field
//! that has history.

use serde::Serialize;

/// Current process variables, refreshed every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalSnapshot {
    /// r(k), metres.
    pub current_setpoint: f32,
    /// r(k-1), metres.
    pub old_setpoint: f32,
    /// Upid(k), volts.
    pub pid_control_voltage: f32,
    /// Upid(k-1), volts.
    pub old_pid_control_voltage: f32,
    /// Manual trimmer voltage, volts.
    pub manual_control_voltage: f32,
    /// h(k), metres.
    pub current_fluid_level: f32,
    /// h(k-1), metres.
    pub old_fluid_level: f32,
    /// Outlet flow, cm³/s.  Telemetry only.
    pub output_flow_rate: f32,
}

impl SignalSnapshot {
    pub fn record_fluid_level(&mut self, level: f32) {
        self.old_fluid_level = self.current_fluid_level;
        self.current_fluid_level = level;
    }

    pub fn record_setpoint(&mut self, setpoint: f32) {
        self.old_setpoint = self.current_setpoint;
        self.current_setpoint = setpoint;
    }

    pub fn record_pid_control_voltage(&mut self, voltage: f32) {
        self.old_pid_control_voltage = self.pid_control_voltage;
        self.pid_control_voltage = voltage;
    }

    /// Shift the PID output history without a new value, for ticks on
    /// which the PID did not run.
    pub fn hold_pid_control_voltage(&mut self) {
        self.record_pid_control_voltage(self.pid_control_voltage);
    }

    /// Control error r(k) - h(k).
    pub fn error(&self) -> f32 {
        self.current_setpoint - self.current_fluid_level
    }

    /// Control error one tick earlier.
    pub fn old_error(&self) -> f32 {
        self.old_setpoint - self.old_fluid_level
    }
}
