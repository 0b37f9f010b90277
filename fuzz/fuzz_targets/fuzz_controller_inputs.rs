//! Fuzz target: `Controller::tick`
//!
//! Every 7 input bytes become one tick: full-width level and set-point
//! codes, coarse flow and manual codes, and the switch bit.  Verifies:
//! - No panics for any code or switch pattern
//! - The pump code never exceeds `code_max`
//! - The PID output stays finite
//!
//! cargo fuzz run fuzz_controller_inputs

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankctl::app::ports::{AnalogInput, AnalogOutput, DiscreteInput, ProcessIo, SwitchInput};
use tankctl::config::ControllerConfig;
use tankctl::controller::Controller;

#[derive(Default)]
struct ByteIo {
    level: u16,
    flow: u16,
    setpoint: u16,
    manual: u16,
    auto: bool,
}

impl ProcessIo for ByteIo {
    fn read_analog_input(&mut self, channel: AnalogInput) -> u16 {
        match channel {
            AnalogInput::FluidLevel => self.level,
            AnalogInput::OutputFlow => self.flow,
        }
    }

    fn read_discrete_input(&mut self, channel: DiscreteInput) -> u16 {
        match channel {
            DiscreteInput::Setpoint => self.setpoint,
            DiscreteInput::ManualVoltage => self.manual,
        }
    }

    fn read_switch(&mut self, _channel: SwitchInput) -> bool {
        self.auto
    }

    fn write_analog_output(&mut self, _channel: AnalogOutput, _code: u16) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ControllerConfig::default();
    let Ok(mut controller) = Controller::new(&config) else {
        return;
    };
    let mut io = ByteIo::default();

    for chunk in data.chunks_exact(7) {
        io.level = u16::from_le_bytes([chunk[0], chunk[1]]);
        io.flow = u16::from(chunk[2]) << 4;
        io.setpoint = u16::from_le_bytes([chunk[3], chunk[4]]);
        io.manual = u16::from(chunk[5]) << 4;
        io.auto = chunk[6] & 1 == 1;

        let out = controller.tick(&mut io);
        assert!(out.output_code <= config.io.pump_output.code_max);
        assert!(controller.signals().pid_control_voltage.is_finite());
    }
});
