//! Background display loop body.
//!
//! Each [`DisplayTask::poll`] drives the consumer half of the handshake.
//! New requests are rate limited by the refresh interval; a received frame
//! is rendered and mirrored onto the panel LEDs.

use log::trace;

use crate::app::ports::{ClockPort, DisplayPort, IndicatorPort};
use crate::display::DisplayFrame;
use crate::display::handshake::{ConsumerStep, HandshakeConsumer};
use crate::display::indicators::LevelBar;

pub struct DisplayTask<'a, C: ClockPort> {
    consumer: HandshakeConsumer<'a, DisplayFrame>,
    clock: C,
    refresh_ms: u64,
    last_request_ms: Option<u64>,
    level_bar: LevelBar,
    frames: u32,
}

impl<'a, C: ClockPort> DisplayTask<'a, C> {
    pub fn new(consumer: HandshakeConsumer<'a, DisplayFrame>, clock: C, refresh_ms: u32) -> Self {
        Self {
            consumer,
            clock,
            refresh_ms: u64::from(refresh_ms),
            last_request_ms: None,
            level_bar: LevelBar::default(),
            frames: 0,
        }
    }

    /// Run one consumer step.  Returns the frame if one was rendered.
    pub fn poll(
        &mut self,
        display: &mut impl DisplayPort,
        indicators: &mut impl IndicatorPort,
    ) -> Option<DisplayFrame> {
        let now = self.clock.now_ms();
        let due = self
            .last_request_ms
            .is_none_or(|last| now.saturating_sub(last) >= self.refresh_ms);

        match self.consumer.poll(due) {
            ConsumerStep::Received(frame) => {
                display.render(&frame);
                indicators.show_level(self.level_bar.segments(frame.signals.current_fluid_level));
                indicators.show_mode(frame.mode);
                self.frames = self.frames.wrapping_add(1);
                Some(frame)
            }
            ConsumerStep::Requested => {
                trace!("display: refresh requested at {now} ms");
                self.last_request_ms = Some(now);
                None
            }
            ConsumerStep::Pending | ConsumerStep::Idle => None,
        }
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u32 {
        self.frames
    }
}
