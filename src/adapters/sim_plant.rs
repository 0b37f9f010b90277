//! Simulated tank rig.
//!
//! Lets the controller run unchanged on the host: a single tank filled by
//! a pump with a dead-zone and drained through an outlet whose flow grows
//! with the square root of the level.  Operator controls live in a shared
//! [`OperatorPanel`] so another thread can turn the trimmers and flip the
//! switch while the control loop owns the tank.
//!
//! ```text
//!   dh/dt = (F_in(u) − F_out(h)) / A
//!   F_in  = PUMP_COEF · u      (u > U_MIN, else 0)
//!   F_out = F_OUT_MAX · √(h / H_MAX)
//!   A     = V / H_MAX
//! ```
//!
//! The plant advances one Euler step of `t0` each time the pump output is
//! written, i.e. exactly once per controller tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::app::ports::{AnalogInput, AnalogOutput, DiscreteInput, ProcessIo, SwitchInput};
use crate::config::{IoScaling, plant};

// ── Operator panel ────────────────────────────────────────────

/// Trimmer codes and the Auto/Manual switch, shared across threads.
#[derive(Debug, Default)]
pub struct OperatorPanel {
    setpoint: AtomicU16,
    manual: AtomicU16,
    auto: AtomicBool,
}

impl OperatorPanel {
    pub fn set_setpoint_code(&self, code: u16) {
        self.setpoint.store(code, Ordering::Relaxed);
    }

    pub fn set_manual_code(&self, code: u16) {
        self.manual.store(code, Ordering::Relaxed);
    }

    pub fn set_auto(&self, on: bool) {
        self.auto.store(on, Ordering::Relaxed);
    }

    pub fn is_auto(&self) -> bool {
        self.auto.load(Ordering::Relaxed)
    }
}

// ── Plant ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SimulatedTank {
    level_m: f32,
    pump_voltage: f32,
    t0: f32,
    scaling: IoScaling,
    panel: Arc<OperatorPanel>,
}

impl SimulatedTank {
    /// Empty tank, switch in Manual, both trimmers at zero.
    pub fn new(scaling: IoScaling, t0: f32) -> Self {
        Self {
            level_m: 0.0,
            pump_voltage: 0.0,
            t0,
            scaling,
            panel: Arc::new(OperatorPanel::default()),
        }
    }

    /// Start from a given level.
    pub fn with_level(mut self, level_m: f32) -> Self {
        self.level_m = level_m.clamp(0.0, plant::FLUID_LEVEL_HIGH_BORDER);
        self
    }

    pub fn panel(&self) -> Arc<OperatorPanel> {
        Arc::clone(&self.panel)
    }

    /// Turn the set-point trimmer to `metres`.
    pub fn set_setpoint(&self, metres: f32) {
        self.panel.set_setpoint_code(to_code(self.scaling.setpoint.engineering_to_raw(metres)));
    }

    /// Turn the manual trimmer to `volts`.
    pub fn set_manual_voltage(&self, volts: f32) {
        self.panel.set_manual_code(to_code(self.scaling.manual_voltage.engineering_to_raw(volts)));
    }

    pub fn set_auto(&self, on: bool) {
        self.panel.set_auto(on);
    }

    pub fn level(&self) -> f32 {
        self.level_m
    }

    /// Voltage currently applied to the pump.
    pub fn pump_voltage(&self) -> f32 {
        self.pump_voltage
    }

    /// Current outlet flow (m³/s).
    pub fn outflow(&self) -> f32 {
        plant::F_OUT_MAX * (self.level_m.max(0.0) / plant::H_MAX).sqrt()
    }

    fn inflow(&self) -> f32 {
        if self.pump_voltage > plant::U_MIN {
            plant::PUMP_COEF * self.pump_voltage
        } else {
            0.0
        }
    }

    fn step(&mut self) {
        let area = plant::TANK_VOLUME / plant::H_MAX;
        let dh = self.t0 * (self.inflow() - self.outflow()) / area;
        self.level_m = (self.level_m + dh).clamp(0.0, plant::FLUID_LEVEL_HIGH_BORDER);
    }
}

fn to_code(raw: i32) -> u16 {
    u16::try_from(raw.max(0)).unwrap_or(u16::MAX)
}

impl ProcessIo for SimulatedTank {
    fn read_analog_input(&mut self, channel: AnalogInput) -> u16 {
        match channel {
            AnalogInput::FluidLevel => to_code(self.scaling.fluid_level.engineering_to_raw(self.level_m)),
            AnalogInput::OutputFlow => {
                // m³/s → cm³/s
                to_code(self.scaling.output_flow.engineering_to_raw(self.outflow() * 1.0e6))
            }
        }
    }

    fn read_discrete_input(&mut self, channel: DiscreteInput) -> u16 {
        match channel {
            DiscreteInput::Setpoint => self.panel.setpoint.load(Ordering::Relaxed),
            DiscreteInput::ManualVoltage => self.panel.manual.load(Ordering::Relaxed),
        }
    }

    fn read_switch(&mut self, _channel: SwitchInput) -> bool {
        self.panel.is_auto()
    }

    fn write_analog_output(&mut self, channel: AnalogOutput, code: u16) {
        match channel {
            AnalogOutput::Pump => {
                self.pump_voltage = self.scaling.pump_output.raw_to_engineering(code);
                self.step();
            }
        }
    }
}
