//! Discrete ISA-form PID for the level loop.
//!
//! Set-point weighting on P and D, backward-difference integration,
//! first-order filtered derivative and conditional-integration anti-windup.
//! Bumpless Manual → Auto transfer back-calculates the integrator so that
//! the first automatic output reproduces the last manual one.
//!
//! ```text
//!   Up(k) = Kp·(b·r(k) − h(k))
//!   Ui(k) = Ui(k−1) + Ci·(e(k−1) − [sat]·(Upid(k−1) − U_MAX)/Tf)
//!   Ud(k) = Cd·T0·Ud(k−1) + Td·Cd·(c·(r(k) − r(k−1)) + h(k−1) − h(k))
//!   Upid  = Up + Ui + Ud + bias
//! ```

use crate::config::PidParameters;
use crate::control::signals::SignalSnapshot;
use crate::error::ConfigError;

/// Coefficients derived once from [`PidParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedGains {
    /// Integral coefficient `T0 / Ti`.
    pub ci: f32,
    /// Derivative filter coefficient `N / (Td + N·T0)`.
    pub cd: f32,
}

impl DerivedGains {
    pub fn from_params(p: &PidParameters) -> Self {
        Self {
            ci: p.t0 / p.ti,
            cd: p.n / (p.td + p.n * p.t0),
        }
    }
}

/// Mutable PID history, owned by the control context.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    pub up: f32,
    pub ui: f32,
    pub old_ui: f32,
    pub ud: f32,
    pub old_ud: f32,
    /// Last computed output exceeded `u_max`.  Read by the next tick.
    pub saturated: bool,
}

/// Stateless PID law bound to one validated parameter set.
#[derive(Debug, Clone)]
pub struct PidEngine {
    params: PidParameters,
    gains: DerivedGains,
}

impl PidEngine {
    /// Validates `params` so that the divisions by `Ti` and `Tf` are safe.
    pub fn new(params: PidParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            gains: DerivedGains::from_params(&params),
            params,
        })
    }

    pub fn params(&self) -> &PidParameters {
        &self.params
    }

    pub fn gains(&self) -> DerivedGains {
        self.gains
    }

    /// Run one PID step and store the result in `signals.pid_control_voltage`.
    ///
    /// `transfer` is the consumed Manual → Auto flag.  The step order is
    /// significant: the anti-windup branch bleeds the integrator by the
    /// excess of the *previous* output, the one that set the saturation
    /// flag, before this step's output is computed.
    pub fn compute(&self, state: &mut PidState, signals: &mut SignalSnapshot, transfer: bool) -> f32 {
        let p = &self.params;
        let DerivedGains { ci, cd } = self.gains;
        // Upid(k-1): the output actually applied last tick.
        let last_output = if transfer {
            signals.manual_control_voltage
        } else {
            signals.pid_control_voltage
        };

        if transfer {
            // Plant assumed at steady state at the moment of transfer.
            state.old_ui = signals.manual_control_voltage - (p.kp + ci) * signals.error();
            if p.reset_derivative_on_transfer {
                state.old_ud = 0.0;
                state.ud = 0.0;
            } else {
                state.old_ud = state.ud;
            }
            // The output being replaced is the manual one.
            state.saturated = signals.manual_control_voltage > p.u_max;
        } else {
            state.old_ud = state.ud;
            state.old_ui = state.ui;
        }

        state.up = p.kp * (p.b * signals.current_setpoint - signals.current_fluid_level);

        let mut integrand = signals.old_error();
        if p.anti_windup && state.saturated {
            integrand -= (last_output - p.u_max) / p.tf;
        }
        state.ui = state.old_ui + ci * integrand;

        state.ud = cd * p.t0 * state.old_ud
            + p.td
                * cd
                * (p.c * (signals.current_setpoint - signals.old_setpoint)
                    + (signals.old_fluid_level - signals.current_fluid_level));

        let output = state.up + state.ui + state.ud + p.bias;
        signals.record_pid_control_voltage(output);
        state.saturated = output > p.u_max;
        output
    }
}
