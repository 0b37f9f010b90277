//! Periodic control timer.
//!
//! On ESP-IDF the scheduler is registered as the argument of a periodic
//! `esp_timer` whose callback runs [`ControlScheduler::on_tick`] in the
//! ESP timer task.  On simulation targets a dedicated thread approximates
//! the period with `thread::sleep`.
//!
//! Either way the scheduler must be `'static`: it is leaked once at boot
//! and from then on only the timer context touches it.

use crate::app::ports::ProcessIo;
use crate::drivers::hw_init::HwInitError;
use crate::scheduler::ControlScheduler;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: `CONTROL_TIMER` is written once in `start_control_timer()` from
/// the main task; only the main task reads it afterwards.
#[cfg(target_os = "espidf")]
unsafe fn control_timer() -> esp_timer_handle_t {
    unsafe { CONTROL_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb<IO: ProcessIo>(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the leaked scheduler passed to `start_control_timer`;
    // the esp_timer task is its only user and never re-enters the callback.
    let scheduler = unsafe { &mut *arg.cast::<ControlScheduler<'static, IO>>() };
    scheduler.on_tick();
}

/// Start calling `scheduler.on_tick()` every `period_us` microseconds.
#[cfg(target_os = "espidf")]
pub fn start_control_timer<IO: ProcessIo + 'static>(
    period_us: u64,
    scheduler: &'static mut ControlScheduler<'static, IO>,
) -> crate::error::Result<()> {
    let arg: *mut ControlScheduler<'static, IO> = scheduler;
    // SAFETY: CONTROL_TIMER is written here once at boot from the main
    // task, before the callback can fire.  Ownership of the scheduler
    // moves to the timer through `arg`.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(control_tick_cb::<IO>),
            arg: arg.cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"control".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret).into());
        }
        let ret = esp_timer_start_periodic(control_timer(), period_us);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret).into());
        }
    }
    info!("hw_timer: control tick every {} us", period_us);
    Ok(())
}

/// Stop the control timer.  The scheduler stays leaked.
#[cfg(target_os = "espidf")]
pub fn stop_control_timer() {
    // SAFETY: control_timer() contract; null-check covers a failed start.
    unsafe {
        let t = control_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static RUNNING: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);

/// Start calling `scheduler.on_tick()` every `period_us` microseconds from
/// a dedicated thread.  Late ticks are not skipped; the thread catches up.
#[cfg(not(target_os = "espidf"))]
pub fn start_control_timer<IO: ProcessIo + Send + 'static>(
    period_us: u64,
    scheduler: &'static mut ControlScheduler<'static, IO>,
) -> crate::error::Result<()> {
    use core::sync::atomic::Ordering;
    use std::time::{Duration, Instant};

    RUNNING.store(true, Ordering::Release);
    let period = Duration::from_micros(period_us);
    std::thread::Builder::new()
        .name("control-tick".into())
        .spawn(move || {
            let mut next = Instant::now();
            while RUNNING.load(Ordering::Acquire) {
                scheduler.on_tick();
                next += period;
                if let Some(wait) = next.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
            }
        })
        .map_err(|e| HwInitError::TimerStartFailed(e.raw_os_error().unwrap_or(-1)))?;
    log::info!("hw_timer(sim): control tick every {} us", period_us);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_control_timer() {
    RUNNING.store(false, core::sync::atomic::Ordering::Release);
}
