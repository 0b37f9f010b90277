//! GPIO / peripheral pin assignments for the tank controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Process sensors and operator trimmers (ADC1, 12-bit)
// ---------------------------------------------------------------------------

/// Level transmitter, 0 – 3.1 V.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const LEVEL_ADC_CHANNEL: u32 = 0;
/// Outlet flow transmitter.  ADC1 channel 1 (GPIO 2).
pub const FLOW_ADC_CHANNEL: u32 = 1;
/// Set-point trimmer.  ADC1 channel 2 (GPIO 3).
pub const SETPOINT_ADC_CHANNEL: u32 = 2;
/// Manual-voltage trimmer.  ADC1 channel 3 (GPIO 4).
pub const MANUAL_ADC_CHANNEL: u32 = 3;

// ---------------------------------------------------------------------------
// Operator switch
// ---------------------------------------------------------------------------

/// Auto/Manual toggle, active LOW with internal pull-up (closed = Auto).
pub const AUTO_SWITCH_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Pump drive (LEDC PWM into an RC filter and the pump amplifier)
// ---------------------------------------------------------------------------

pub const PUMP_PWM_GPIO: i32 = 5;
/// LEDC resolution matches the 12-bit code range of the converters.
pub const PWM_RESOLUTION_BITS: u32 = 12;
/// 12-bit LEDC tops out near 19.5 kHz at 80 MHz APB.
pub const PUMP_PWM_FREQ_HZ: u32 = 19_000;

// ---------------------------------------------------------------------------
// Front-panel LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// Level bar, lowest segment first.
pub const LEVEL_LED_GPIOS: [i32; 5] = [11, 12, 13, 14, 15];
pub const MANUAL_LED_GPIO: i32 = 16;
pub const AUTO_LED_GPIO: i32 = 17;
