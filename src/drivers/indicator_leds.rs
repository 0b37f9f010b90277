//! Front-panel LEDs: five-segment level bar plus Manual/Auto lamps.
//!
//! Generic over `embedded_hal::digital::OutputPin` so the same driver runs
//! on `esp-idf-hal` pin drivers and on test doubles.  A failed pin write
//! only costs one refresh, so errors are dropped.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::IndicatorPort;
use crate::control::mode::Mode;
use crate::display::indicators::mode_lamps;

pub struct PanelLeds<P: OutputPin> {
    bar: [P; 5],
    manual: P,
    auto: P,
}

impl<P: OutputPin> PanelLeds<P> {
    /// `bar` is ordered lowest segment first.
    pub fn new(bar: [P; 5], manual: P, auto: P) -> Self {
        Self { bar, manual, auto }
    }
}

impl<P: OutputPin> IndicatorPort for PanelLeds<P> {
    fn show_level(&mut self, segments: u8) {
        for (i, led) in self.bar.iter_mut().enumerate() {
            let _ = led.set_state(PinState::from(i < usize::from(segments)));
        }
    }

    fn show_mode(&mut self, mode: Mode) {
        let (manual, auto) = mode_lamps(mode);
        let _ = self.manual.set_state(PinState::from(manual));
        let _ = self.auto.set_state(PinState::from(auto));
    }
}
