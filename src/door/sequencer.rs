//! Command sequencing: desired direction → ordered relay pulses.
//!
//! One relay pulse acts like a press of the opener's wall button: from rest
//! at an extreme it starts travel, mid-travel it stops the motor, and from a
//! stop it restarts travel in the opposite direction. Reversing therefore
//! takes a stop pulse, a settle pause long enough for the motor to halt, and
//! a restart pulse; reversing a door that was last moving *toward* the
//! requested direction takes a full three-pulse cycle. The plan is computed
//! here as data; executing it against the relay is the service's job.

use heapless::Vec;

use crate::error::CommandError;

use super::DoorState;

/// The two command intents the outside world can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Open,
    Close,
}

impl Direction {
    /// The extreme this direction ends at.
    pub const fn target(self) -> DoorState {
        match self {
            Self::Open => DoorState::Open,
            Self::Close => DoorState::Closed,
        }
    }

    /// The transit state travelling this way.
    pub const fn moving(self) -> DoorState {
        match self {
            Self::Open => DoorState::Opening,
            Self::Close => DoorState::Closing,
        }
    }

    /// The transit state travelling the other way.
    pub const fn opposing(self) -> DoorState {
        match self {
            Self::Open => DoorState::Closing,
            Self::Close => DoorState::Opening,
        }
    }

    /// The extreme this direction starts from.
    pub const fn origin(self) -> DoorState {
        match self {
            Self::Open => DoorState::Closed,
            Self::Close => DoorState::Open,
        }
    }
}

/// One step of a pulse sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseAction {
    /// Energise the relay for the configured active duration.
    Pulse,
    /// Wait the configured settle pause so the motor fully stops.
    Settle,
}

/// Longest defined sequence: pulse, settle, pulse, settle, pulse.
pub const MAX_ACTIONS: usize = 5;

/// An ordered pulse/settle sequence plus the state the door is expected to
/// end in. An empty `actions` list means the request was already satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulsePlan {
    pub actions: Vec<PulseAction, MAX_ACTIONS>,
    pub result: DoorState,
}

impl PulsePlan {
    fn new(actions: &[PulseAction], result: DoorState) -> Self {
        let mut v = Vec::new();
        // MAX_ACTIONS covers every row of the decision table.
        for a in actions {
            let _ = v.push(*a);
        }
        Self { actions: v, result }
    }

    /// Number of relay pulses this plan issues.
    pub fn pulse_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PulseAction::Pulse))
            .count()
    }

    /// Number of settle pauses this plan waits through.
    pub fn settle_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PulseAction::Settle))
            .count()
    }
}

use PulseAction::{Pulse, Settle};

/// Compute the pulse sequence driving the door toward `direction`.
///
/// Direction-normalized decision table; `Close` is the exact mirror of
/// `Open`. `Stopped` with unrecorded or useless history is a hard failure —
/// guessing could drive the door the wrong way.
pub fn plan(
    direction: Direction,
    current: DoorState,
    last_state: Option<DoorState>,
) -> Result<PulsePlan, CommandError> {
    let moving = direction.moving();

    // Already there, or already on the way: idempotent, zero pulses.
    if current == direction.target() || current == moving {
        return Ok(PulsePlan::new(&[], current));
    }

    // Resting at the far extreme: one pulse starts travel.
    if current == direction.origin() {
        return Ok(PulsePlan::new(&[Pulse], moving));
    }

    // Moving the wrong way: stop, settle, restart reversed.
    if current == direction.opposing() {
        return Ok(PulsePlan::new(&[Pulse, Settle, Pulse], moving));
    }

    // Stopped mid-travel: the stop already happened, so the pulse count
    // depends on which way the door was last moving.
    debug_assert_eq!(current, DoorState::Stopped);
    match last_state {
        // Was moving the wrong way when stopped: restart is already a
        // reversal, two pulses.
        Some(s) if s == direction.opposing() => {
            Ok(PulsePlan::new(&[Pulse, Settle, Pulse], moving))
        }
        // Was moving the requested way when stopped: a restart would head
        // the wrong way first, so pass through the full reversal cycle.
        Some(s) if s == moving => Ok(PulsePlan::new(
            &[Pulse, Settle, Pulse, Settle, Pulse],
            moving,
        )),
        // No usable history: refuse rather than guess.
        _ => Err(CommandError::UnknownTransition),
    }
}
