//! Front-panel LED logic: the five-segment level bar and the mode lamps.

use crate::control::mode::Mode;

/// Level (m) at which each bar segment lights: 2, 4, 6, 8, 10 cm.
pub const LEVEL_THRESHOLDS_M: [f32; 5] = [0.02, 0.04, 0.06, 0.08, 0.10];

/// Maps a fluid level to the number of lit bar segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelBar {
    thresholds: [f32; 5],
}

impl Default for LevelBar {
    fn default() -> Self {
        Self {
            thresholds: LEVEL_THRESHOLDS_M,
        }
    }
}

impl LevelBar {
    /// Segments lit at `level_m`; a segment is lit at or above its threshold.
    pub fn segments(&self, level_m: f32) -> u8 {
        self.thresholds.iter().filter(|t| level_m >= **t).count() as u8
    }
}

/// `(manual_lamp, auto_lamp)`; exactly one is on.
pub fn mode_lamps(mode: Mode) -> (bool, bool) {
    match mode {
        Mode::Manual => (true, false),
        Mode::Auto => (false, true),
    }
}
