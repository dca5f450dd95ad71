//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the limit switches and the relay driver, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module that routes
//! real hardware into the domain; the concrete pin and delay types are
//! injected (ESP-IDF `PinDriver`s and the FreeRTOS delay on device, mocks in
//! tests), so the adapter itself compiles on any target.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::door::SensorSignature;
use crate::drivers::relay::RelayDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::LimitSwitches;

/// Concrete adapter combining all door hardware behind the port traits.
pub struct HardwareAdapter<T, B, P, D> {
    switches: LimitSwitches<T, B>,
    relay: RelayDriver<P, D>,
}

impl<T, B, P, D> HardwareAdapter<T, B, P, D>
where
    T: InputPin,
    B: InputPin,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(switches: LimitSwitches<T, B>, relay: RelayDriver<P, D>) -> Self {
        Self { switches, relay }
    }

    /// Lifetime relay pulses issued, for telemetry.
    pub fn pulses_issued(&self) -> u64 {
        self.relay.pulses_issued()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<T, B, P, D> SensorPort for HardwareAdapter<T, B, P, D>
where
    T: InputPin,
    B: InputPin,
    P: OutputPin,
    D: DelayNs,
{
    fn read_limits(&mut self) -> Result<SensorSignature, SensorError> {
        self.switches.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<T, B, P, D> ActuatorPort for HardwareAdapter<T, B, P, D>
where
    T: InputPin,
    B: InputPin,
    P: OutputPin,
    D: DelayNs,
{
    fn pulse(&mut self, active_ms: u32) -> Result<(), ActuatorError> {
        self.relay.pulse(active_ms)
    }

    fn settle(&mut self, pause_ms: u32) {
        self.relay.settle(pause_ms);
    }
}
