//! The controller aggregate.
//!
//! [`Controller`] owns everything the control law mutates: PID parameters
//! and history, the mode arbiter, the signal snapshot and the output stage.
//! It is created once from a validated [`ControllerConfig`] and then driven
//! by [`Controller::tick`] exactly once per sample period.
//!
//! ```text
//!  every tick:  level ─▶ flow ─▶ setpoint ─┬─ Auto:   PID ─▶ pump ─▶ switch
//!                                          └─ Manual: trimmer ─▶ pump ─▶ switch
//! ```

use log::info;

use crate::app::ports::{AnalogInput, DiscreteInput, ProcessIo, SwitchInput};
use crate::config::{ControllerConfig, IoScaling, PidParameters};
use crate::control::mode::{Mode, ModeArbiter};
use crate::control::output::OutputStage;
use crate::control::pid::{PidEngine, PidState};
use crate::control::signals::SignalSnapshot;
use crate::error::Result;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Mode the tick ran in.
    pub mode: Mode,
    /// Mode selected by the switch for the next tick.
    pub next_mode: Mode,
    /// Code written to the pump.
    pub output_code: u16,
    /// The PID output of an Auto tick exceeded the actuator limit.
    pub saturated: bool,
}

/// Parameters, state and signals of the level loop.
#[derive(Debug)]
pub struct Controller {
    pid: PidEngine,
    state: PidState,
    arbiter: ModeArbiter,
    signals: SignalSnapshot,
    scaling: IoScaling,
    output: OutputStage,
}

impl Controller {
    /// Validate `config` and build a controller in Manual with zeroed state.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        config.validate()?;
        let pid = PidEngine::new(config.pid)?;

        let p = pid.params();
        let g = pid.gains();
        info!(
            "controller: Kp={} Ti={}s Td={}s N={} Tf={}s b={} c={} T0={}s (Ci={:.5} Cd={:.4}) \
             anti_windup={} d_reset={} bias={}V",
            p.kp,
            p.ti,
            p.td,
            p.n,
            p.tf,
            p.b,
            p.c,
            p.t0,
            g.ci,
            g.cd,
            p.anti_windup,
            p.reset_derivative_on_transfer,
            p.bias
        );

        Ok(Self {
            pid,
            state: PidState::default(),
            arbiter: ModeArbiter::new(),
            signals: SignalSnapshot::default(),
            scaling: config.io,
            output: OutputStage::new(config.io.pump_output),
        })
    }

    /// Run one sample period.  Never blocks and never fails.
    pub fn tick(&mut self, io: &mut impl ProcessIo) -> TickOutcome {
        let mode = self.arbiter.mode();

        let level = self
            .scaling
            .fluid_level
            .raw_to_engineering(io.read_analog_input(AnalogInput::FluidLevel));
        self.signals.record_fluid_level(level);

        self.signals.output_flow_rate = self
            .scaling
            .output_flow
            .raw_to_engineering(io.read_analog_input(AnalogInput::OutputFlow));

        // Tracked in Manual too, so the display and the first Auto tick see
        // a fresh set-point and a matching history.
        let setpoint = self
            .scaling
            .setpoint
            .raw_to_engineering(io.read_discrete_input(DiscreteInput::Setpoint));
        self.signals.record_setpoint(setpoint);

        let output_code = match mode {
            Mode::Auto => {
                let transfer = self.arbiter.take_transition();
                let voltage = self.pid.compute(&mut self.state, &mut self.signals, transfer);
                self.output.apply(io, voltage)
            }
            Mode::Manual => {
                self.signals.manual_control_voltage = self
                    .scaling
                    .manual_voltage
                    .raw_to_engineering(io.read_discrete_input(DiscreteInput::ManualVoltage));
                self.signals.hold_pid_control_voltage();
                self.output.apply(io, self.signals.manual_control_voltage)
            }
        };

        let next_mode = self.arbiter.derive_mode(io.read_switch(SwitchInput::AutoManual));

        TickOutcome {
            mode,
            next_mode,
            output_code,
            saturated: mode == Mode::Auto && self.state.saturated,
        }
    }

    pub fn mode(&self) -> Mode {
        self.arbiter.mode()
    }

    pub fn signals(&self) -> &SignalSnapshot {
        &self.signals
    }

    pub fn pid_state(&self) -> &PidState {
        &self.state
    }

    pub fn params(&self) -> &PidParameters {
        self.pid.params()
    }

    /// Last code written to the pump.
    pub fn output_code(&self) -> u16 {
        self.output.last_code()
    }

    /// A Manual → Auto transfer is waiting for the next tick.
    pub fn transfer_pending(&self) -> bool {
        self.arbiter.transition_pending()
    }
}
