//! Door state machine: history bookkeeping around the pure resolver.
//!
//! Owns the current state, the previously committed state (the history the
//! resolver infers direction from), and the monotonic timestamp of the last
//! commit. Every mutation goes through here; the resolver itself stays pure.

use log::{debug, warn};

use crate::error::ResolveError;

use super::{resolver, DoorState, SensorSignature};

/// A committed state change, handed to the caller so it can notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DoorState,
    pub to: DoorState,
    /// Monotonic commit time, milliseconds.
    pub at_ms: u64,
}

/// The single mutable record for one physical door.
///
/// Created once at startup from an initial sensor read and mutated only by
/// [`handle_sensor_event`](Self::handle_sensor_event) (resolver-driven) and
/// [`advance`](Self::advance) (command-driven optimistic estimate).
pub struct DoorStateMachine {
    current: DoorState,
    /// The state committed before `current`. `None` until the second commit,
    /// or after an actuator fault wipes the history.
    last_state: Option<DoorState>,
    /// Monotonic time of the last commit. Non-decreasing.
    last_update_ms: u64,
    /// Debounce window applied to every resolution, milliseconds.
    debounce_ms: u64,
}

impl DoorStateMachine {
    /// Seed the machine from the initial sensor read. An extreme signature
    /// pins the state exactly; anything else starts as `Stopped` with no
    /// history, so commands fail closed until the sensors say more.
    pub fn from_signature(sig: SensorSignature, debounce_ms: u64, now_ms: u64) -> Self {
        let current = match (sig.top, sig.bottom) {
            (true, false) => DoorState::Open,
            (false, true) => DoorState::Closed,
            _ => DoorState::Stopped,
        };
        debug!("machine seeded: {} from {:?}", current.name(), sig);
        Self {
            current,
            last_state: None,
            last_update_ms: now_ms,
            debounce_ms,
        }
    }

    pub fn current(&self) -> DoorState {
        self.current
    }

    pub fn last_state(&self) -> Option<DoorState> {
        self.last_state
    }

    /// Monotonic time of the last committed transition, milliseconds.
    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    /// Milliseconds the current state has been held.
    pub fn state_age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_update_ms)
    }

    /// Whether `now_ms` still falls inside the debounce window.
    pub fn in_debounce_window(&self, now_ms: u64) -> bool {
        self.state_age_ms(now_ms) < self.debounce_ms
    }

    /// Feed one sensor reading through the resolver.
    ///
    /// * Debounce is expected chatter: dropped silently, `Ok(None)`.
    /// * A resolution equal to the current state commits nothing.
    /// * A new state commits and returns the [`Transition`] to notify.
    /// * Ambiguity propagates; the committed state is left untouched.
    pub fn handle_sensor_event(
        &mut self,
        sig: SensorSignature,
        now_ms: u64,
    ) -> Result<Option<Transition>, ResolveError> {
        let elapsed = self.state_age_ms(now_ms);
        match resolver::resolve(sig, self.current, self.last_state, elapsed, self.debounce_ms) {
            Ok(resolved) if resolved == self.current => Ok(None),
            Ok(resolved) => Ok(Some(self.commit(resolved, now_ms))),
            Err(ResolveError::Debounce { elapsed_ms }) => {
                debug!(
                    "sensor event dropped: {} ms since last commit (< {} ms debounce)",
                    elapsed_ms, self.debounce_ms
                );
                Ok(None)
            }
            Err(e @ ResolveError::Ambiguous) => {
                warn!(
                    "unresolvable reading {:?} in state {} (last {:?})",
                    sig,
                    self.current.name(),
                    self.last_state.map(DoorState::name)
                );
                Err(e)
            }
        }
    }

    /// Optimistically commit the state a pulse sequence is expected to leave
    /// the door in, without waiting for sensor confirmation. The sensors
    /// later confirm it, or the resolver's priority rules reconcile it.
    pub fn advance(&mut self, to: DoorState, now_ms: u64) -> Transition {
        self.commit(to, now_ms)
    }

    /// Discard trust in the current estimate after an actuator fault: the
    /// door is somewhere unknown. `Stopped` with no history makes every
    /// command fail `UnknownTransition` until a limit switch re-engages and
    /// a sensor event commits a trusted state.
    pub fn invalidate(&mut self, now_ms: u64) {
        warn!("state invalidated; awaiting sensor confirmation");
        self.current = DoorState::Stopped;
        self.last_state = None;
        self.last_update_ms = self.last_update_ms.max(now_ms);
    }

    fn commit(&mut self, to: DoorState, now_ms: u64) -> Transition {
        let from = self.current;
        self.last_state = Some(from);
        self.current = to;
        // Clock is monotonic upstream; max() keeps last_update_ms
        // non-decreasing even if two triggers land on the same tick.
        self.last_update_ms = self.last_update_ms.max(now_ms);
        Transition {
            from,
            to,
            at_ms: self.last_update_ms,
        }
    }
}
