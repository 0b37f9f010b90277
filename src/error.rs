//! Unified error types for the tank controller firmware.
//!
//! The periodic control path never fails: every out-of-range input is
//! clamped.  Errors only exist at startup, where an invalid configuration
//! must stop the control loop from ever being armed.  All variants are
//! `Copy` so they can be logged and matched without allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible startup operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// Peripheral or timer initialisation failed.
    Hardware(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Reasons a [`ControllerConfig`](crate::config::ControllerConfig) is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Integral time `Ti` is zero; `Ci = T0 / Ti` would divide by zero.
    ZeroIntegralTime,
    /// Anti-windup time constant `Tf` is zero.
    ZeroAntiWindupTime,
    /// Sample period `T0` is zero or negative.
    NonPositiveSamplePeriod,
    /// `Td + N·T0` is zero; the derivative filter coefficient is undefined.
    DegenerateDerivativeFilter,
    /// A gain or time constant is NaN or infinite.
    NonFinite(&'static str),
    /// A channel's `code_min` is not below its `code_max`.
    EmptyCodeRange(&'static str),
    /// A channel's engineering scale is zero, negative or non-finite.
    InvalidScale(&'static str),
    /// The display refresh interval is zero.
    ZeroRefreshInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroIntegralTime => write!(f, "integral time Ti must be non-zero"),
            Self::ZeroAntiWindupTime => write!(f, "anti-windup time Tf must be non-zero"),
            Self::NonPositiveSamplePeriod => write!(f, "sample period T0 must be positive"),
            Self::DegenerateDerivativeFilter => write!(f, "Td + N*T0 must be non-zero"),
            Self::NonFinite(field) => write!(f, "{field} must be finite"),
            Self::EmptyCodeRange(channel) => write!(f, "{channel}: code_min must be below code_max"),
            Self::InvalidScale(channel) => write!(f, "{channel}: scale must be positive and finite"),
            Self::ZeroRefreshInterval => write!(f, "display refresh interval must be non-zero"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
