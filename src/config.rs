//! System configuration parameters
//!
//! All tunable timing for the door controller. Defaults come from the bay
//! hardware: the opener's wall-button input wants a ~1 s closure, and the
//! motor needs a real pause to spin down before it will reverse.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    // --- State resolution ---
    /// Minimum time between accepted state commits (milliseconds).
    /// Suppresses limit-switch chatter immediately after a transition.
    pub debounce_interval_ms: u64,
    /// Age after which an `Opening`/`Closing` estimate is no longer trusted
    /// (milliseconds). A command against a transit state older than this is
    /// planned as if the door had stopped mid-travel.
    pub transit_timeout_ms: u64,

    // --- Relay pulses ---
    /// How long the relay stays energised per pulse (milliseconds).
    pub pulse_active_ms: u32,
    /// Pause between reversal pulses so the motor fully halts (milliseconds).
    pub settle_pause_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            // State resolution
            debounce_interval_ms: 3_000,
            transit_timeout_ms: 20_000,

            // Relay pulses
            pulse_active_ms: 1_000,
            settle_pause_ms: 1_500,

            // Timing
            control_loop_interval_ms: 250,
            telemetry_interval_secs: 60,
        }
    }
}

impl DoorConfig {
    /// Range-check the configuration. Invalid values are rejected, not
    /// clamped, so a bad provisioning payload cannot silently weaken the
    /// debounce or zero out the settle pause.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.debounce_interval_ms == 0 {
            return Err(crate::error::Error::Config("debounce interval must be non-zero"));
        }
        if self.pulse_active_ms == 0 {
            return Err(crate::error::Error::Config("pulse duration must be non-zero"));
        }
        if self.settle_pause_ms == 0 {
            return Err(crate::error::Error::Config("settle pause must be non-zero"));
        }
        if self.transit_timeout_ms <= self.debounce_interval_ms {
            return Err(crate::error::Error::Config(
                "transit timeout must exceed the debounce interval",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(crate::error::Error::Config("control loop interval must be non-zero"));
        }
        Ok(())
    }
}
