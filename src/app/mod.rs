//! Application boundary: port traits and the events crossing them.
//!
//! All interaction with hardware happens through the traits in [`ports`],
//! keeping the controller and display logic fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
