//! Operating-mode arbitration.
//!
//! The Auto/Manual switch is sampled once per tick.  A Manual → Auto edge
//! raises a one-shot transfer flag that the PID engine consumes exactly once
//! to initialise its integrator from the last manual output.

use serde::Serialize;

/// Controller operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Operator trimmer drives the pump directly.
    #[default]
    Manual,
    /// Closed-loop PID drives the pump.
    Auto,
}

impl Mode {
    /// Switch on means Auto.
    pub fn from_switch(switch_on: bool) -> Self {
        if switch_on { Self::Auto } else { Self::Manual }
    }
}

/// Tracks the current mode and the pending Manual → Auto transfer.
#[derive(Debug, Default)]
pub struct ModeArbiter {
    mode: Mode,
    transfer_pending: bool,
}

impl ModeArbiter {
    /// Starts in Manual with no transfer pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the mode from the switch and return it.
    pub fn derive_mode(&mut self, switch_on: bool) -> Mode {
        let next = Mode::from_switch(switch_on);
        if self.mode == Mode::Manual && next == Mode::Auto {
            debug_assert!(
                !self.transfer_pending,
                "manual-to-auto transfer raised twice without being consumed"
            );
            self.transfer_pending = true;
        }
        self.mode = next;
        next
    }

    /// Consume the transfer flag.  Returns `true` at most once per edge.
    pub fn take_transition(&mut self) -> bool {
        core::mem::take(&mut self.transfer_pending)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transition_pending(&self) -> bool {
        self.transfer_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_manual() {
        let arb = ModeArbiter::new();
        assert_eq!(arb.mode(), Mode::Manual);
        assert!(!arb.transition_pending());
    }

    #[test]
    fn manual_to_auto_raises_one_shot_flag() {
        let mut arb = ModeArbiter::new();
        assert_eq!(arb.derive_mode(true), Mode::Auto);
        assert!(arb.take_transition());
        assert!(!arb.take_transition());
    }

    #[test]
    fn staying_in_auto_does_not_raise_flag() {
        let mut arb = ModeArbiter::new();
        arb.derive_mode(true);
        arb.take_transition();
        arb.derive_mode(true);
        assert!(!arb.transition_pending());
    }

    #[test]
    fn auto_to_manual_needs_no_transfer() {
        let mut arb = ModeArbiter::new();
        arb.derive_mode(true);
        arb.take_transition();
        assert_eq!(arb.derive_mode(false), Mode::Manual);
        assert!(!arb.transition_pending());
    }

    #[test]
    fn every_manual_to_auto_edge_raises_again() {
        let mut arb = ModeArbiter::new();
        for _ in 0..3 {
            arb.derive_mode(true);
            assert!(arb.take_transition());
            arb.derive_mode(false);
        }
    }
}
