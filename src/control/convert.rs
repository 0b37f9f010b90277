//! Raw code ⇄ engineering unit conversion.
//!
//! Every process channel is a 12-bit converter code with a dead band at the
//! bottom of the range.  Out-of-range codes are clamped, never rejected: the
//! control path favours continuous operation over fault reporting.

use serde::{Deserialize, Serialize};

/// Linear scaling of one converter channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelScale {
    /// Code that maps to zero engineering units.
    pub code_min: u16,
    /// Highest code taken at face value; anything above saturates here.
    pub code_max: u16,
    /// Engineering units per code.
    pub scale: f32,
    /// Converted values below this snap to exactly zero.
    pub noise_floor: f32,
}

impl ChannelScale {
    /// Convert a raw code into clamped engineering units.
    pub fn raw_to_engineering(&self, code: u16) -> f32 {
        let counts = if code < self.code_min {
            0
        } else if code > self.code_max {
            self.code_max - self.code_min
        } else {
            code - self.code_min
        };

        let value = f32::from(counts) * self.scale;
        if value < self.noise_floor { 0.0 } else { value }
    }

    /// Convert engineering units back into a code.
    ///
    /// Only the upper bound is clamped.  Values below zero produce codes
    /// below `code_min` (possibly negative); callers decide what the
    /// hardware can represent.
    pub fn engineering_to_raw(&self, value: f32) -> i32 {
        let code = ((value / self.scale).round() as i32).saturating_add(i32::from(self.code_min));
        code.min(i32::from(self.code_max))
    }

    /// Engineering value at the top of the range.
    pub fn full_scale(&self) -> f32 {
        f32::from(self.code_max - self.code_min) * self.scale
    }
}
