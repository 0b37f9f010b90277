//! Controller configuration.
//!
//! All tuning and scaling parameters for the tank controller.  The values
//! are set once at startup and never persisted; [`ControllerConfig::validate`]
//! must pass before the control loop is armed.

use serde::{Deserialize, Serialize};

use crate::control::convert::ChannelScale;
use crate::error::ConfigError;

/// Physical constants of the tank rig the default scaling is derived from.
pub mod plant {
    /// Pump supply voltage at full drive (V).
    pub const U_MAX: f32 = 10.0;
    /// Pump dead-zone: below this voltage no fluid is moved (V).
    pub const U_MIN: f32 = 3.0;
    /// Tank height (m).
    pub const H_MAX: f32 = 0.1;
    /// Tank volume (m³).
    pub const TANK_VOLUME: f32 = 0.001;
    /// Time to fill the empty tank at full drive with the outlet closed (s).
    pub const T_FILLING: f32 = 25.0;
    /// Pump coefficient (m³/s per V).
    pub const PUMP_COEF: f32 = TANK_VOLUME / (U_MAX * T_FILLING);
    /// Maximum inflow (m³/s).
    pub const F_IN_MAX: f32 = PUMP_COEF * U_MAX;
    /// Maximum outflow, reached with a full tank (m³/s).
    pub const F_OUT_MAX: f32 = F_IN_MAX / 2.0;
    /// Level-sensor dead band (m).
    pub const FLUID_LEVEL_LOW_BORDER: f32 = 0.0001;
    /// Level reported at the top of the sensor's code range (m).
    pub const FLUID_LEVEL_HIGH_BORDER: f32 = H_MAX + FLUID_LEVEL_LOW_BORDER;

    /// Lowest usable ADC/DAC code; the first 95 codes are ignored.
    pub const CODE_MIN: u16 = 95;
    /// Highest usable ADC/DAC code.
    pub const CODE_MAX: u16 = 4055;
    /// Usable code span.
    pub const CODE_SPAN: f32 = (CODE_MAX - CODE_MIN) as f32;
}

// ---------------------------------------------------------------------------
// PID tuning
// ---------------------------------------------------------------------------

/// PID tuning and behaviour switches.
///
/// `ci = t0 / ti` and `cd = n / (td + n·t0)` are derived by the PID engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidParameters {
    /// Proportional gain (V/m).
    pub kp: f32,
    /// Integral time (s).
    pub ti: f32,
    /// Derivative time (s).
    pub td: f32,
    /// Derivative filter constant.
    pub n: f32,
    /// Anti-windup time constant (s).
    pub tf: f32,
    /// Set-point weight of the proportional term.
    pub b: f32,
    /// Set-point weight of the derivative term.
    pub c: f32,
    /// Fixed sample period (s).
    pub t0: f32,
    /// Actuator upper limit used for the saturation decision (V).
    pub u_max: f32,
    /// Constant added to the output to lift the pump out of its dead-zone (V).
    pub bias: f32,
    /// Bleed the integrator while the previous output was saturated.
    pub anti_windup: bool,
    /// Zero the derivative history on a Manual → Auto transfer.
    pub reset_derivative_on_transfer: bool,
}

impl PidParameters {
    /// Full-featured tuning: anti-windup, derivative reset and bias.
    pub fn standard() -> Self {
        let td = 0.1;
        let n = 20.0;
        Self {
            kp: 30.0,
            ti: 6.0,
            td,
            n,
            tf: td / n,
            b: 1.0,
            c: 0.0,
            t0: 0.1,
            u_max: plant::U_MAX,
            bias: 0.5,
            anti_windup: true,
            reset_derivative_on_transfer: true,
        }
    }

    /// Same gains without anti-windup, derivative reset or bias.
    pub fn basic() -> Self {
        Self {
            bias: 0.0,
            anti_windup: false,
            reset_derivative_on_transfer: false,
            ..Self::standard()
        }
    }

    /// Reject gains the discrete law cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("kp", self.kp),
            ("ti", self.ti),
            ("td", self.td),
            ("n", self.n),
            ("tf", self.tf),
            ("b", self.b),
            ("c", self.c),
            ("t0", self.t0),
            ("u_max", self.u_max),
            ("bias", self.bias),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        if self.ti == 0.0 {
            return Err(ConfigError::ZeroIntegralTime);
        }
        if self.tf == 0.0 {
            return Err(ConfigError::ZeroAntiWindupTime);
        }
        if self.t0 <= 0.0 {
            return Err(ConfigError::NonPositiveSamplePeriod);
        }
        if self.td + self.n * self.t0 == 0.0 {
            return Err(ConfigError::DegenerateDerivativeFilter);
        }
        Ok(())
    }
}

impl Default for PidParameters {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// I/O scaling
// ---------------------------------------------------------------------------

/// Code ⇄ engineering-unit scaling for every process channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IoScaling {
    /// Level sensor, metres.
    pub fluid_level: ChannelScale,
    /// Outlet flow sensor, cm³/s.
    pub output_flow: ChannelScale,
    /// Set-point trimmer, metres.
    pub setpoint: ChannelScale,
    /// Manual-voltage trimmer, volts.
    pub manual_voltage: ChannelScale,
    /// Pump drive output, volts per code.
    pub pump_output: ChannelScale,
}

impl Default for IoScaling {
    fn default() -> Self {
        use plant::{CODE_MAX, CODE_MIN, CODE_SPAN};

        let linear = |span: f32, noise_floor: f32| ChannelScale {
            code_min: CODE_MIN,
            code_max: CODE_MAX,
            scale: span / CODE_SPAN,
            noise_floor,
        };

        Self {
            fluid_level: linear(plant::FLUID_LEVEL_HIGH_BORDER, plant::FLUID_LEVEL_LOW_BORDER),
            // ~max outflow with 0.5 % headroom, m³/s → cm³/s
            output_flow: linear(plant::F_OUT_MAX * 1.005 * 1.0e6, 0.0),
            setpoint: linear(plant::H_MAX, 0.0),
            manual_voltage: linear(plant::U_MAX, 0.0),
            pump_output: linear(plant::U_MAX, 0.0),
        }
    }
}

impl IoScaling {
    fn validate(&self) -> Result<(), ConfigError> {
        let channels = [
            ("fluid_level", &self.fluid_level),
            ("output_flow", &self.output_flow),
            ("setpoint", &self.setpoint),
            ("manual_voltage", &self.manual_voltage),
            ("pump_output", &self.pump_output),
        ];
        for (name, ch) in channels {
            if ch.code_min >= ch.code_max {
                return Err(ConfigError::EmptyCodeRange(name));
            }
            if !ch.scale.is_finite() || ch.scale <= 0.0 {
                return Err(ConfigError::InvalidScale(name));
            }
            if !ch.noise_floor.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything the controller needs at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub pid: PidParameters,
    pub io: IoScaling,
    /// Minimum interval between display refresh requests (milliseconds).
    pub display_refresh_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pid: PidParameters::standard(),
            io: IoScaling::default(),
            display_refresh_ms: 250,
        }
    }
}

impl ControllerConfig {
    /// Reject configurations the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pid.validate()?;
        self.io.validate()?;
        if self.display_refresh_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }

    /// Sample period rounded to whole microseconds, for timer registration.
    pub fn sample_period_us(&self) -> u64 {
        (f64::from(self.pid.t0) * 1_000_000.0).round() as u64
    }
}
