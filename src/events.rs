//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (limit-switch edges, wall-button presses)
//! - Timer callbacks (control ticks, telemetry)
//! - Software (the RPC front end queueing open/close requests)
//!
//! Events are consumed by the main control loop, one at a time — this queue
//! is what serialises sensor commits and command requests onto the single
//! exclusive-access path the door record requires. A command that arrives
//! while a pulse sequence is in flight simply waits in the queue; nothing
//! ever interleaves mid-sequence.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│              │     │              │
//! │ Timer ISR   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Software    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// System event types, ordered by rough priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// A limit switch engaged or disengaged — re-resolve now.
    LimitEdge = 0,

    /// Open requested by the front end.
    OpenRequested = 10,
    /// Close requested by the front end.
    CloseRequested = 11,

    /// Periodic control tick (limit poll + button pump).
    ControlTick = 20,
    /// Telemetry report timer fired.
    TelemetryTick = 30,

    /// Debounced short button press (toggle travel).
    ButtonShortPress = 40,
    /// Long button press (force state resync).
    ButtonLongPress = 41,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs write (produce), main loop reads (consume).
// Uses atomic head/tail indices; the buffer lives in a static so ISR
// callbacks can reach it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: one producer side (ISR / timer context), one consumer (main loop).
// Each slot is written before EVENT_HEAD is released and read before
// EVENT_TAIL is released, so no slot is accessed concurrently.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; this slot is not visible to the consumer
    // until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::LimitEdge),
        10 => Some(Event::OpenRequested),
        11 => Some(Event::CloseRequested),
        20 => Some(Event::ControlTick),
        30 => Some(Event::TelemetryTick),
        40 => Some(Event::ButtonShortPress),
        41 => Some(Event::ButtonLongPress),
        _ => None,
    }
}
