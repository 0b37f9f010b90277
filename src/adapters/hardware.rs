//! Hardware adapter: bridges real peripherals to [`ProcessIo`].
//!
//! Converter channels go through the ADC1 oneshot helpers, the pump through
//! the LEDC driver, and the Auto/Manual switch through any
//! `embedded_hal` input pin.  This is the only module the control tick
//! reaches hardware through.  On non-espidf targets the ADC and LEDC
//! helpers are simulation stubs.

use embedded_hal::digital::InputPin;

use crate::app::ports::{AnalogInput, AnalogOutput, DiscreteInput, ProcessIo, SwitchInput};
use crate::drivers::hw_init;
use crate::drivers::pump::PumpDriver;
use crate::pins;

/// Concrete adapter combining the board's process I/O.
pub struct HardwareAdapter<S: InputPin> {
    auto_switch: S,
    pump: PumpDriver,
}

impl<S: InputPin> HardwareAdapter<S> {
    /// `auto_switch` is active LOW: a closed contact selects Auto.
    pub fn new(auto_switch: S, pump: PumpDriver) -> Self {
        Self { auto_switch, pump }
    }

    pub fn pump(&self) -> &PumpDriver {
        &self.pump
    }
}

// ── ProcessIo implementation ──────────────────────────────────

impl<S: InputPin> ProcessIo for HardwareAdapter<S> {
    fn read_analog_input(&mut self, channel: AnalogInput) -> u16 {
        match channel {
            AnalogInput::FluidLevel => hw_init::adc1_read(pins::LEVEL_ADC_CHANNEL),
            AnalogInput::OutputFlow => hw_init::adc1_read(pins::FLOW_ADC_CHANNEL),
        }
    }

    fn read_discrete_input(&mut self, channel: DiscreteInput) -> u16 {
        match channel {
            DiscreteInput::Setpoint => hw_init::adc1_read(pins::SETPOINT_ADC_CHANNEL),
            DiscreteInput::ManualVoltage => hw_init::adc1_read(pins::MANUAL_ADC_CHANNEL),
        }
    }

    fn read_switch(&mut self, channel: SwitchInput) -> bool {
        match channel {
            // An unreadable switch means Manual.
            SwitchInput::AutoManual => self.auto_switch.is_low().unwrap_or(false),
        }
    }

    fn write_analog_output(&mut self, channel: AnalogOutput, code: u16) {
        match channel {
            AnalogOutput::Pump => self.pump.write(code),
        }
    }
}
