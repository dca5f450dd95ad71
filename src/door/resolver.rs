//! Pure state resolution: sensor fusion under ambiguity.
//!
//! Both limit sensors disengaged could mean opening, closing, or stopped —
//! the signature alone cannot say. The resolver breaks the tie in strict
//! priority order: direct sensor confirmation outranks historical inference,
//! and historical inference outranks "assume no change". The first matching
//! rule wins; anything left over is an ambiguity failure, never a guess.

use crate::error::ResolveError;

use super::{DoorState, SensorSignature, STATE_TABLE};

/// Resolve the door's state from one sensor reading plus history.
///
/// * `sensor` — the current limit-switch signature.
/// * `current` — the last committed state.
/// * `last_state` — the state committed before `current`, if any.
/// * `elapsed_ms` — monotonic time since the last commit.
/// * `debounce_ms` — minimum elapsed time before a resolution is accepted.
///
/// Pure function: no clock, no I/O, no logging. Every resolution outcome is
/// a value the caller must handle.
pub fn resolve(
    sensor: SensorSignature,
    current: DoorState,
    last_state: Option<DoorState>,
    elapsed_ms: u64,
    debounce_ms: u64,
) -> Result<DoorState, ResolveError> {
    // Rule 1: inside the debounce window nothing is accepted, regardless of
    // what the sensors claim. Suppresses switch chatter right after a commit.
    if elapsed_ms < debounce_ms {
        return Err(ResolveError::Debounce { elapsed_ms });
    }

    // Rule 2: a signature unique to exactly one state is a physical limit
    // currently engaged — highest confidence, history is irrelevant.
    let mut unique = None;
    let mut matches = 0usize;
    for def in &STATE_TABLE {
        if def.signature == sensor {
            matches += 1;
            unique = Some(def.state);
        }
    }
    if matches == 1 {
        // Reachable only for the extremes; all transits share a signature.
        return Ok(unique.unwrap_or(current));
    }

    // Both switches engaged maps to nothing: wiring or magnet fault.
    if sensor.is_conflicting() {
        return Err(ResolveError::Ambiguous);
    }

    // Rule 3: both limits clear and the door was at an extreme — it just
    // departed. The table links each extreme to exactly one transit state.
    for def in &STATE_TABLE {
        if def.follows == Some(current) {
            return Ok(def.state);
        }
    }

    // Rule 4: both limits clear with no new information. A moving state is
    // exactly what this signature looks like mid-travel, so it holds;
    // Stopped holds only when history agrees the door was already stopped.
    // Extremes never get here (rule 3 catches them).
    if matches!(current, DoorState::Opening | DoorState::Closing)
        || last_state == Some(current)
    {
        return Ok(current);
    }

    // Rule 5: no defined transition fits.
    Err(ResolveError::Ambiguous)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE_MS: u64 = 3_000;

    fn sig(top: u8, bottom: u8) -> SensorSignature {
        SensorSignature::new(top != 0, bottom != 0)
    }

    /// The canonical resolution oracle: (sensor, current, last, elapsed_ms)
    /// → expected state.
    #[test]
    fn transition_table() {
        use DoorState::{Closed, Closing, Open, Opening};

        let cases: &[(SensorSignature, DoorState, DoorState, u64, DoorState)] = &[
            // Static states
            (sig(0, 1), Closed, Closed, 5_000, Closed),
            (sig(1, 0), Open, Open, 5_000, Open),
            (sig(0, 0), Closing, Closing, 5_000, Closing),
            (sig(0, 0), Opening, Opening, 5_000, Opening),
            // Regular transitions
            (sig(0, 0), Closed, Closing, 5_000, Opening),
            (sig(0, 0), Open, Opening, 5_000, Closing),
            (sig(0, 1), Closing, Open, 5_000, Closed),
            (sig(1, 0), Opening, Closed, 5_000, Open),
            // Unusual transitions: a limit engaging overrides everything
            (sig(0, 1), Open, Opening, 5_000, Closed),
            (sig(1, 0), Closed, Closing, 5_000, Open),
        ];

        for &(sensor, current, last, elapsed, expected) in cases {
            let got = resolve(sensor, current, Some(last), elapsed, DEBOUNCE_MS);
            assert_eq!(
                got,
                Ok(expected),
                "resolve({sensor:?}, {current:?}, {last:?}, {elapsed}) -> {got:?}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn debounce_rejects_everything_early() {
        use DoorState::{Closed, Open, Stopped};

        for sensor in [sig(0, 0), sig(0, 1), sig(1, 0), sig(1, 1)] {
            for current in [Open, Closed, Stopped] {
                let got = resolve(sensor, current, Some(current), 100, DEBOUNCE_MS);
                assert_eq!(got, Err(ResolveError::Debounce { elapsed_ms: 100 }));
            }
        }
    }

    #[test]
    fn debounce_boundary_is_inclusive_of_interval() {
        // Exactly at the interval the event is accepted.
        let got = resolve(sig(0, 1), DoorState::Closed, None, DEBOUNCE_MS, DEBOUNCE_MS);
        assert_eq!(got, Ok(DoorState::Closed));
        let got = resolve(sig(0, 1), DoorState::Closed, None, DEBOUNCE_MS - 1, DEBOUNCE_MS);
        assert!(matches!(got, Err(ResolveError::Debounce { .. })));
    }

    #[test]
    fn extreme_signatures_win_regardless_of_history() {
        use DoorState::{Closed, Closing, Open, Opening, Stopped};

        for current in [Open, Closed, Opening, Closing, Stopped] {
            for last in [None, Some(Open), Some(Stopped), Some(current)] {
                assert_eq!(resolve(sig(1, 0), current, last, 5_000, DEBOUNCE_MS), Ok(Open));
                assert_eq!(resolve(sig(0, 1), current, last, 5_000, DEBOUNCE_MS), Ok(Closed));
            }
        }
    }

    #[test]
    fn both_switches_engaged_is_ambiguous() {
        let got = resolve(sig(1, 1), DoorState::Closed, Some(DoorState::Closed), 5_000, DEBOUNCE_MS);
        assert_eq!(got, Err(ResolveError::Ambiguous));
    }

    #[test]
    fn departed_extreme_inferred_without_history() {
        // Rule 3 keys on `current` alone; `last_state` may be anything.
        let got = resolve(sig(0, 0), DoorState::Closed, None, 5_000, DEBOUNCE_MS);
        assert_eq!(got, Ok(DoorState::Opening));
        let got = resolve(sig(0, 0), DoorState::Open, None, 5_000, DEBOUNCE_MS);
        assert_eq!(got, Ok(DoorState::Closing));
    }

    #[test]
    fn moving_states_hold_without_history_but_stopped_does_not() {
        use DoorState::{Closed, Closing, Opening, Stopped};

        // Opening/Closing hold on the all-clear signature no matter what the
        // history slot says; Stopped with the same reading may not.
        for current in [Opening, Closing] {
            for last in [None, Some(Closed), Some(Stopped)] {
                assert_eq!(
                    resolve(sig(0, 0), current, last, 5_000, DEBOUNCE_MS),
                    Ok(current)
                );
            }
        }
        assert_eq!(
            resolve(sig(0, 0), Stopped, None, 5_000, DEBOUNCE_MS),
            Err(ResolveError::Ambiguous)
        );
        assert_eq!(
            resolve(sig(0, 0), Stopped, Some(Closing), 5_000, DEBOUNCE_MS),
            Err(ResolveError::Ambiguous)
        );
    }

    #[test]
    fn stopped_without_matching_history_is_ambiguous() {
        // Stopped follows nothing, and history disagrees — nothing to infer.
        let got = resolve(sig(0, 0), DoorState::Stopped, Some(DoorState::Opening), 5_000, DEBOUNCE_MS);
        assert_eq!(got, Err(ResolveError::Ambiguous));
        let got = resolve(sig(0, 0), DoorState::Stopped, None, 5_000, DEBOUNCE_MS);
        assert_eq!(got, Err(ResolveError::Ambiguous));
    }

    #[test]
    fn stopped_holds_when_history_agrees() {
        let got = resolve(
            sig(0, 0),
            DoorState::Stopped,
            Some(DoorState::Stopped),
            5_000,
            DEBOUNCE_MS,
        );
        assert_eq!(got, Ok(DoorState::Stopped));
    }
}
