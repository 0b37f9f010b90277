//! Display side of the controller.
//!
//! ```text
//!  ControlScheduler ──▶ HandshakeProducer ═══▶ HandshakeConsumer ──▶ DisplayTask
//!  (timer context)            four atomic flags + one slot           (background)
//!                                                                     ├─▶ DisplayPort
//!                                                                     └─▶ IndicatorPort
//! ```
//!
//! The periodic tick publishes a [`DisplayFrame`] only when the display
//! asked for one, so the slow consumer never stalls the control loop and
//! never sees a half-written frame.

pub mod handshake;
pub mod indicators;
pub mod task;

use serde::Serialize;

use crate::control::mode::Mode;
use crate::control::signals::SignalSnapshot;

/// One consistent view of the controller, as published through the handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DisplayFrame {
    pub signals: SignalSnapshot,
    pub mode: Mode,
    /// Code last written to the pump.
    pub output_code: u16,
    /// Scheduler tick count when the frame was captured.
    pub tick: u32,
}
