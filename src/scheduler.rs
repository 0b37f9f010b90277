//! Periodic control entry point.
//!
//! [`ControlScheduler::on_tick`] is the only thing the timer callback calls.
//! It runs one controller tick, publishes noteworthy edges into the event
//! queue and advances the display handshake by one step.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 esp_timer / sim thread (every T0)            │
//! │                              │                               │
//! │                              ▼                               │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Controller::tick(io)                                  │  │
//! │  │    level ─▶ flow ─▶ setpoint ─▶ PID | manual ─▶ pump   │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          │                                   │
//! │          ┌───────────────┴───────────────┐                   │
//! │          ▼                               ▼                   │
//! │   EventProducer::enqueue         HandshakeProducer::poll     │
//! │   (mode / saturation edges)      (DisplayFrame on request)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here blocks, allocates or logs.

use crate::app::events::{ControlEvent, EventProducer};
use crate::app::ports::ProcessIo;
use crate::control::mode::Mode;
use crate::controller::{Controller, TickOutcome};
use crate::display::DisplayFrame;
use crate::display::handshake::HandshakeProducer;

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Owns the controller and the producer halves of both cross-context
/// channels for the lifetime of the timer.
pub struct ControlScheduler<'a, IO: ProcessIo> {
    controller: Controller,
    io: IO,
    display: HandshakeProducer<'a, DisplayFrame>,
    events: EventProducer<'a>,
    tick: u32,
    was_saturated: bool,
    dropped_events: u32,
}

impl<'a, IO: ProcessIo> ControlScheduler<'a, IO> {
    pub fn new(
        controller: Controller,
        io: IO,
        display: HandshakeProducer<'a, DisplayFrame>,
        events: EventProducer<'a>,
    ) -> Self {
        Self {
            controller,
            io,
            display,
            events,
            tick: 0,
            was_saturated: false,
            dropped_events: 0,
        }
    }

    /// One sample period.  Called from the periodic timer context.
    pub fn on_tick(&mut self) -> TickOutcome {
        let outcome = self.controller.tick(&mut self.io);
        self.tick = self.tick.wrapping_add(1);
        let tick = self.tick;

        if outcome.next_mode != outcome.mode {
            self.publish(ControlEvent::ModeChanged {
                from: outcome.mode,
                to: outcome.next_mode,
                tick,
            });
        }

        // Saturation edges are only meaningful while the PID is in charge;
        // leaving Auto while saturated reports the clear on the next Auto
        // tick that is in range.
        if outcome.mode == Mode::Auto {
            match (self.was_saturated, outcome.saturated) {
                (false, true) => self.publish(ControlEvent::SaturationEntered { tick }),
                (true, false) => self.publish(ControlEvent::SaturationCleared { tick }),
                _ => {}
            }
            self.was_saturated = outcome.saturated;
        }

        let controller = &self.controller;
        self.display.poll(|| DisplayFrame {
            signals: *controller.signals(),
            mode: controller.mode(),
            output_code: outcome.output_code,
            tick,
        });

        outcome
    }

    fn publish(&mut self, event: ControlEvent) {
        if self.events.enqueue(event).is_err() {
            self.dropped_events = self.dropped_events.saturating_add(1);
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Ticks run since start (wraps).
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Events lost because the background loop fell behind.
    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
