//! Fuzz target: `ControllerConfig` from JSON
//!
//! Feeds arbitrary bytes through the same path `tank-sim --config` uses.
//! Verifies:
//! - Parsing and validation never panic
//! - A config that validates always builds a controller
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankctl::config::ControllerConfig;
use tankctl::controller::Controller;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<ControllerConfig>(data) else {
        return;
    };
    if config.validate().is_ok() {
        assert!(Controller::new(&config).is_ok());
    }
});
