//! Four-flag rendezvous between the control tick and the display.
//!
//! The display raises `request`; the tick claims it (`producer_ack`), fills
//! the slot on its next pass and raises `ready`; the display copies the slot
//! and answers with `consumer_ack`; the tick then lowers both and the
//! exchange is over.
//!
//! ```text
//!   Idle ──request──▶ Requested ──claim──▶ Claimed ──publish──▶ Ready
//!    ▲                                                            │
//!    └──────────────── release ◀── Acknowledged ◀──── take ───────┘
//! ```
//!
//! The producer does exactly one step per call and never waits.  The slot
//! is written only while `ready` is low and read only while it is high;
//! `ready` is stored with `Release` after the write and loaded with
//! `Acquire` before the read, which orders the slot accesses.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// Where an exchange currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    Idle,
    Requested,
    Claimed,
    Ready,
    Acknowledged,
}

/// What one producer poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerStep {
    /// Acknowledgement seen; the exchange is closed.
    Released,
    /// A frame was written and `ready` raised.
    Published,
    /// A fresh request was claimed; the frame follows next poll.
    Claimed,
    Idle,
}

/// What one consumer poll did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsumerStep<T> {
    /// A published frame was copied out.
    Received(T),
    /// A new request was raised.
    Requested,
    /// An exchange is in flight; nothing to do yet.
    Pending,
    /// Nothing in flight and no refresh due.
    Idle,
}

/// Shared flags and slot.  Split once into its two halves.
pub struct Handshake<T> {
    request: AtomicBool,
    producer_ack: AtomicBool,
    ready: AtomicBool,
    consumer_ack: AtomicBool,
    slot: UnsafeCell<T>,
}

// SAFETY: the slot is only touched through the single producer and single
// consumer handed out by `split`, and the `ready` flag ensures they never
// access it at the same time (see module docs).
unsafe impl<T: Copy + Send> Sync for Handshake<T> {}

impl<T: Copy> Handshake<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            request: AtomicBool::new(false),
            producer_ack: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            consumer_ack: AtomicBool::new(false),
            slot: UnsafeCell::new(initial),
        }
    }

    /// Hand out the producer and consumer halves.
    ///
    /// Borrowing `self` mutably guarantees one of each exists at a time.
    pub fn split(&mut self) -> (HandshakeProducer<'_, T>, HandshakeConsumer<'_, T>) {
        let shared = &*self;
        (HandshakeProducer { shared }, HandshakeConsumer { shared })
    }

    fn phase(&self) -> HandshakePhase {
        if self.consumer_ack.load(Ordering::Acquire) {
            HandshakePhase::Acknowledged
        } else if self.ready.load(Ordering::Acquire) {
            HandshakePhase::Ready
        } else if self.producer_ack.load(Ordering::Acquire) {
            HandshakePhase::Claimed
        } else if self.request.load(Ordering::Acquire) {
            HandshakePhase::Requested
        } else {
            HandshakePhase::Idle
        }
    }
}

/// Tick-side half.
pub struct HandshakeProducer<'a, T> {
    shared: &'a Handshake<T>,
}

impl<T: Copy> HandshakeProducer<'_, T> {
    /// Advance the exchange by at most one step.
    ///
    /// `frame` is only evaluated when the slot is about to be written.
    pub fn poll(&mut self, frame: impl FnOnce() -> T) -> ProducerStep {
        let hs = self.shared;

        if hs.consumer_ack.load(Ordering::Acquire) {
            // `ready` must drop before `consumer_ack` so the consumer cannot
            // start a new request while the old frame still looks ready.
            hs.ready.store(false, Ordering::Release);
            hs.consumer_ack.store(false, Ordering::Release);
            ProducerStep::Released
        } else if hs.producer_ack.load(Ordering::Acquire) {
            // SAFETY: `ready` is low, so the consumer is not reading the
            // slot, and only this half ever writes it.
            unsafe { *hs.slot.get() = frame() };
            hs.producer_ack.store(false, Ordering::Release);
            hs.ready.store(true, Ordering::Release);
            ProducerStep::Published
        } else if hs.request.load(Ordering::Acquire) && !hs.ready.load(Ordering::Acquire) {
            hs.producer_ack.store(true, Ordering::Release);
            ProducerStep::Claimed
        } else {
            ProducerStep::Idle
        }
    }

    pub fn phase(&self) -> HandshakePhase {
        self.shared.phase()
    }
}

/// Display-side half.
pub struct HandshakeConsumer<'a, T> {
    shared: &'a Handshake<T>,
}

impl<T: Copy> HandshakeConsumer<'_, T> {
    /// Collect a published frame, or raise a request when `refresh_due` and
    /// no exchange is in flight.
    pub fn poll(&mut self, refresh_due: bool) -> ConsumerStep<T> {
        let hs = self.shared;

        // `consumer_ack` first: the producer lowers `ready` before it lowers
        // the acknowledgement, so a low ack read here means any later `ready`
        // read belongs to a fresh frame.
        let acked = hs.consumer_ack.load(Ordering::Acquire);
        let ready = hs.ready.load(Ordering::Acquire);

        if ready && !acked {
            // SAFETY: `ready` is high, so the producer will not write the
            // slot until it has seen our acknowledgement.
            let frame = unsafe { *hs.slot.get() };
            hs.request.store(false, Ordering::Release);
            hs.consumer_ack.store(true, Ordering::Release);
            return ConsumerStep::Received(frame);
        }

        let in_flight = ready || acked || hs.request.load(Ordering::Acquire);
        if in_flight {
            ConsumerStep::Pending
        } else if refresh_due {
            hs.request.store(true, Ordering::Release);
            ConsumerStep::Requested
        } else {
            ConsumerStep::Idle
        }
    }

    pub fn phase(&self) -> HandshakePhase {
        self.shared.phase()
    }
}
