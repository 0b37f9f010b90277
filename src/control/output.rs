//! Pump output stage.
//!
//! Maps a control voltage to an actuator code and writes it.  The code is
//! clamped at `code_max` only; the bottom of the range is the `code_min`
//! offset, so negative control voltages reach the actuator as codes below
//! `code_min`.  Codes below zero saturate at 0 because the actuator
//! register is unsigned.

use crate::app::ports::{AnalogOutput, ProcessIo};
use crate::control::convert::ChannelScale;

/// Writes control voltages to the pump channel and remembers the last code.
#[derive(Debug, Clone)]
pub struct OutputStage {
    scale: ChannelScale,
    last_code: u16,
}

impl OutputStage {
    pub fn new(scale: ChannelScale) -> Self {
        Self {
            scale,
            last_code: scale.code_min,
        }
    }

    /// `round(v / volts_per_code) + code_min`, upper-clamped.
    pub fn voltage_to_code(&self, voltage: f32) -> u16 {
        let code = self.scale.engineering_to_raw(voltage);
        u16::try_from(code).unwrap_or(0)
    }

    /// Convert and write `voltage`; returns the code written.
    pub fn apply(&mut self, io: &mut impl ProcessIo, voltage: f32) -> u16 {
        let code = self.voltage_to_code(voltage);
        io.write_analog_output(AnalogOutput::Pump, code);
        self.last_code = code;
        code
    }

    /// Last code written to the actuator.
    pub fn last_code(&self) -> u16 {
        self.last_code
    }
}
