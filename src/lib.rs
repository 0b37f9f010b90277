//! Tank level controller firmware library.
//!
//! Exposes the control law, the scheduler and the display handshake for
//! integration testing and the host simulator.  All ESP-IDF-specific code
//! is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod controller;
pub mod display;
pub mod error;
pub mod scheduler;

// Hardware-facing modules; host builds get the cfg-gated stubs inside.
pub mod adapters;
pub mod drivers;
pub mod pins;
