//! Momentary relay driver for the door opener's wall-button input.
//!
//! The opener exposes exactly one control: shorting its button terminals.
//! The relay coil sits on a GPIO; a "pulse" energises it for a fixed active
//! duration and releases it, like a finger on the button.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator: it never decides *whether* to pulse. Pulse
//! counts, ordering, and the settle pause between reversal pulses are the
//! sequencer's responsibility. The one rule enforced here is that the coil
//! is always released, even when energising it reported an error.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct RelayDriver<P, D> {
    pin: P,
    delay: D,
    pulses_issued: u64,
}

impl<P: OutputPin, D: DelayNs> RelayDriver<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            pulses_issued: 0,
        }
    }

    /// Energise the relay for `active_ms`, then release it. Blocks for the
    /// full duration — the opener samples its button input slowly.
    pub fn pulse(&mut self, active_ms: u32) -> Result<(), ActuatorError> {
        if self.pin.set_high().is_err() {
            // Best effort: never leave the coil possibly energised.
            let _ = self.pin.set_low();
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.delay.delay_ms(active_ms);
        self.pin
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.pulses_issued += 1;
        Ok(())
    }

    /// Block for the inter-pulse settle pause.
    pub fn settle(&mut self, pause_ms: u32) {
        self.delay.delay_ms(pause_ms);
    }

    /// Lifetime pulses successfully issued.
    pub fn pulses_issued(&self) -> u64 {
        self.pulses_issued
    }
}
