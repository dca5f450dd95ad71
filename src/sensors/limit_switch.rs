//! Paired travel-limit reed switches.
//!
//! One switch at the top of travel (door fully open), one at the bottom
//! (fully closed). Both are wired active-low with pull-ups: a magnet at the
//! limit closes the switch and pulls the line low, so *low = engaged*.
//! Neither engaged means the door is somewhere in between — which of the
//! transit states that is cannot be told from here; that's the resolver's
//! problem.

use embedded_hal::digital::InputPin;

use crate::door::SensorSignature;
use crate::error::SensorError;

pub struct LimitSwitches<T, B> {
    top: T,
    bottom: B,
    last: SensorSignature,
}

impl<T: InputPin, B: InputPin> LimitSwitches<T, B> {
    pub fn new(top: T, bottom: B) -> Self {
        Self {
            top,
            bottom,
            last: SensorSignature::AMBIGUOUS,
        }
    }

    /// Sample both switches into a signature. Active-low wiring: engaged
    /// reads as a low pin.
    pub fn read(&mut self) -> Result<SensorSignature, SensorError> {
        let top = self.top.is_low().map_err(|_| SensorError::GpioReadFailed)?;
        let bottom = self
            .bottom
            .is_low()
            .map_err(|_| SensorError::GpioReadFailed)?;
        self.last = SensorSignature::new(top, bottom);
        Ok(self.last)
    }

    /// Most recent successfully sampled signature.
    pub fn last(&self) -> SensorSignature {
        self.last
    }
}
