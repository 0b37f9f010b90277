//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 channels and the pump's LEDC timer/channel using raw
//! ESP-IDF sys calls.  Called once from `main()` before the control timer
//! starts.  GPIO pins are owned through `esp-idf-hal` drivers instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    LedcInitFailed(i32),
    TimerStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::TimerStartFailed(rc) => write!(f, "control timer start failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> crate::error::Result<()> {
    // SAFETY: Called once from main() before the control timer; single-threaded.
    unsafe {
        init_adc()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> crate::error::Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once by `init_adc()` before the control
/// timer starts; afterwards only the timer task reads it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let channels = [
        pins::LEVEL_ADC_CHANNEL,
        pins::FLOW_ADC_CHANNEL,
        pins::SETPOINT_ADC_CHANNEL,
        pins::MANUAL_ADC_CHANNEL,
    ];
    for channel in channels {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH0=level, CH1=flow, CH2=setpoint, CH3=manual)");
    Ok(())
}

/// Read one 12-bit ADC1 sample.  A failed conversion reads as 0, which the
/// converter clamps like any other out-of-range code.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; only the control timer task reads.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_PUMP: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_12_BIT,
        freq_hz: pins::PUMP_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from the single main-task context via init_peripherals().
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: LEDC_CH_PUMP,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::PUMP_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!(
        "hw_init: LEDC configured (pump=CH0, {}-bit @ {} Hz)",
        pins::PWM_RESOLUTION_BITS,
        pins::PUMP_PWM_FREQ_HZ
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: LEDC channels were configured in init_ledc(); only the
    // control timer task writes the pump duty.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_failing_peripheral() {
        assert_eq!(HwInitError::AdcInitFailed(-1).to_string(), "ADC1 init failed (rc=-1)");
        assert!(HwInitError::TimerStartFailed(259).to_string().contains("259"));
    }

    #[test]
    fn host_init_is_a_no_op() {
        let result: crate::error::Result<()> = init_peripherals();
        assert_eq!(result, Ok(()));
        assert_eq!(adc1_read(crate::pins::LEVEL_ADC_CHANNEL), 0);
    }
}
