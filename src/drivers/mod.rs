//! Peripheral initialisation, the control timer and actuator/LED drivers.

pub mod hw_init;
pub mod hw_timer;
pub mod indicator_leds;
pub mod pump;
