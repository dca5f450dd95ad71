//! Outbound application events.
//!
//! The [`DoorService`](super::service::DoorService) emits these through the
//! [`EventSink`](super::ports::EventSink) port after every *committed*
//! transition. Adapters on the other side decide what to do with them —
//! log to serial, POST to the home-automation hub, publish over MQTT.

use serde::Serialize;

use crate::door::machine::Transition;
use crate::door::{DoorState, SensorSignature};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum DoorEvent {
    /// The service has started (carries the seeded state).
    Started(DoorState),

    /// A state transition was committed (sensor- or command-driven).
    StateChanged(Transition),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    pub state: DoorState,
    pub last_state: Option<DoorState>,
    /// Raw limit-switch signature at snapshot time.
    pub limits: SensorSignature,
    /// How long the current state has been held, milliseconds.
    pub state_age_ms: u64,
    /// Lifetime relay pulses issued since boot.
    pub pulse_count: u64,
}

/// Webhook body for the home-automation hub's `CurrentDoorState`
/// characteristic. The hub expects the state digit as a JSON *string*
/// ([`DoorState::hub_value`]); the transport that delivers this is an
/// adapter concern, the wire shape is owned (and pinned by test) here.
#[derive(Debug, Clone, Serialize)]
pub struct StateChangePayload {
    pub characteristic: &'static str,
    pub value: &'static str,
}

impl StateChangePayload {
    pub fn for_state(state: DoorState) -> Self {
        Self {
            characteristic: "CurrentDoorState",
            value: state.hub_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_hub_wire_format() {
        // The hub parses the state digit as a string, not a number.
        let json = serde_json::to_string(&StateChangePayload::for_state(DoorState::Opening))
            .unwrap();
        assert_eq!(json, r#"{"characteristic":"CurrentDoorState","value":"2"}"#);
    }

    #[test]
    fn payload_values_cover_all_states() {
        let values: std::vec::Vec<&str> = [
            DoorState::Open,
            DoorState::Closed,
            DoorState::Opening,
            DoorState::Closing,
            DoorState::Stopped,
        ]
        .into_iter()
        .map(|s| StateChangePayload::for_state(s).value)
        .collect();
        assert_eq!(values, vec!["0", "1", "2", "3", "4"]);
    }
}
