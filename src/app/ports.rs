//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorService (domain)
//! ```
//!
//! Driven adapters (limit switches, relay, event sinks) implement these
//! traits. The [`DoorService`](super::service::DoorService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::door::SensorSignature;
use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample both limit switches.
pub trait SensorPort {
    /// Current engaged/disengaged signature of the top and bottom switches.
    fn read_limits(&mut self) -> Result<SensorSignature, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the single primitive the opener hardware exposes.
///
/// Implementations block for the full active/pause duration — the physical
/// motor needs real wall-clock time, and the domain relies on `pulse`
/// returning only after the relay has de-energised.
pub trait ActuatorPort {
    /// Energise the relay for `active_ms`, then release it.
    fn pulse(&mut self, active_ms: u32) -> Result<(), ActuatorError>;

    /// Wait `pause_ms` between reversal pulses so the motor fully stops.
    fn settle(&mut self, pause_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → notification / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits committed [`DoorEvent`](super::events::DoorEvent)s
/// through this port. Adapters decide where they go (serial log, webhook to
/// the home-automation hub, MQTT, ...).
///
/// Deliberately infallible: delivery failures are the adapter's problem and
/// must never roll back or block a committed transition.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::DoorEvent);
}
