//! Control events raised by the periodic tick.
//!
//! The tick must not log or block, so noteworthy edges are pushed into a
//! lock-free SPSC queue and drained by the background loop:
//!
//! ```text
//! ┌──────────────┐  enqueue  ┌──────────────┐  dequeue  ┌──────────────┐
//! │ Timer tick   │──────────▶│  spsc::Queue │──────────▶│  Background  │
//! │ (producer)   │           │  (lock-free) │           │  → EventSink │
//! └──────────────┘           └──────────────┘           └──────────────┘
//! ```

use heapless::spsc::{Consumer, Producer, Queue};

use crate::app::ports::EventSink;
use crate::control::mode::Mode;

/// Queue slots (one is kept free by the SPSC ring, so 15 usable).
pub const EVENT_QUEUE_CAP: usize = 16;

pub type EventQueue = Queue<ControlEvent, EVENT_QUEUE_CAP>;
pub type EventProducer<'a> = Producer<'a, ControlEvent, EVENT_QUEUE_CAP>;
pub type EventConsumer<'a> = Consumer<'a, ControlEvent, EVENT_QUEUE_CAP>;

/// Edges worth reporting, stamped with the tick they happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// The Auto/Manual switch moved.
    ModeChanged { from: Mode, to: Mode, tick: u32 },
    /// The PID output went above the actuator limit.
    SaturationEntered { tick: u32 },
    /// The PID output came back within the actuator limit.
    SaturationCleared { tick: u32 },
}

/// Forward every pending event to `sink`.  Returns how many were drained.
pub fn drain_events(consumer: &mut EventConsumer<'_>, sink: &mut impl EventSink) -> usize {
    let mut drained = 0;
    while let Some(event) = consumer.dequeue() {
        sink.emit(&event);
        drained += 1;
    }
    drained
}
