//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured door events to the logger
//! (UART / USB-CDC in production). The webhook adapter that notifies the
//! home-automation hub implements the same trait on the other side of the
//! network; this one is also what keeps commits observable when no hub is
//! configured.

use log::info;

use crate::app::events::{DoorEvent, StateChangePayload};
use crate::app::ports::EventSink;
use crate::door::DoorState;

/// Adapter that logs every [`DoorEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DoorEvent) {
        match event {
            DoorEvent::Started(state) => {
                info!("START | initial_state={}", state.name());
            }
            DoorEvent::StateChanged(t) => {
                let payload = StateChangePayload::for_state(t.to);
                info!(
                    "STATE | {} -> {} at {} ms (hub value {})",
                    t.from.name(),
                    t.to.name(),
                    t.at_ms,
                    payload.value,
                );
            }
            DoorEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={} | last={} | top={} bottom={} | age={} ms | pulses={}",
                    t.state.name(),
                    t.last_state.map_or("-", DoorState::name),
                    t.limits.top,
                    t.limits.bottom,
                    t.state_age_ms,
                    t.pulse_count,
                );
            }
        }
    }
}
