//! Pump drive output.
//!
//! The pump amplifier takes a 0 – 10 V control signal produced by filtering
//! a 12-bit LEDC PWM.  The PWM duty is the actuator code itself, so the
//! output stage's code maps straight onto the register.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init helpers.
//! On host/test: tracks the code in-memory only.

use crate::drivers::hw_init;

/// Highest duty the 12-bit timer accepts.
pub const MAX_DUTY: u16 = (1 << 12) - 1;

#[derive(Debug, Default)]
pub struct PumpDriver {
    code: u16,
}

impl PumpDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the pump with `code`, clipped to the timer resolution.
    pub fn write(&mut self, code: u16) {
        let duty = code.min(MAX_DUTY);
        hw_init::ledc_set(hw_init::LEDC_CH_PUMP, u32::from(duty));
        self.code = duty;
    }

    /// Duty currently applied.
    pub fn code(&self) -> u16 {
        self.code
    }
}
