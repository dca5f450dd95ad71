//! Property and fuzz-style tests for the resolver and the pulse sequencer.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use baydoor::door::resolver::resolve;
use baydoor::door::sequencer::{plan, Direction, PulseAction};
use baydoor::door::{DoorState, SensorSignature};
use baydoor::error::ResolveError;
use proptest::prelude::*;

fn arb_state() -> impl Strategy<Value = DoorState> {
    prop_oneof![
        Just(DoorState::Open),
        Just(DoorState::Closed),
        Just(DoorState::Opening),
        Just(DoorState::Closing),
        Just(DoorState::Stopped),
    ]
}

fn arb_signature() -> impl Strategy<Value = SensorSignature> {
    (any::<bool>(), any::<bool>()).prop_map(|(top, bottom)| SensorSignature::new(top, bottom))
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Open), Just(Direction::Close)]
}

fn mirror(s: DoorState) -> DoorState {
    match s {
        DoorState::Open => DoorState::Closed,
        DoorState::Closed => DoorState::Open,
        DoorState::Opening => DoorState::Closing,
        DoorState::Closing => DoorState::Opening,
        DoorState::Stopped => DoorState::Stopped,
    }
}

// ── Resolver invariants ───────────────────────────────────────

proptest! {
    /// Total over its whole input space: every resolution is either a
    /// defined state or a typed error, never a panic.
    #[test]
    fn resolver_is_total(
        sensor in arb_signature(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
        elapsed in 0u64..=100_000,
        debounce in 1u64..=10_000,
    ) {
        let _ = resolve(sensor, current, last, elapsed, debounce);
    }

    /// Inside the debounce window nothing else can be observed, no matter
    /// what the sensors claim.
    #[test]
    fn debounce_dominates_everything(
        sensor in arb_signature(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
        debounce in 1u64..=10_000,
    ) {
        let elapsed = debounce - 1;
        prop_assert_eq!(
            resolve(sensor, current, last, elapsed, debounce),
            Err(ResolveError::Debounce { elapsed_ms: elapsed })
        );
    }

    /// Outside the window, an engaged extreme overrides any current state
    /// and any history.
    #[test]
    fn engaged_extreme_dominates_history(
        current in arb_state(),
        last in proptest::option::of(arb_state()),
        elapsed in 10_000u64..=100_000,
    ) {
        prop_assert_eq!(
            resolve(SensorSignature::new(true, false), current, last, elapsed, 3_000),
            Ok(DoorState::Open)
        );
        prop_assert_eq!(
            resolve(SensorSignature::new(false, true), current, last, elapsed, 3_000),
            Ok(DoorState::Closed)
        );
    }

    /// A successful resolution never produces a state whose defined
    /// signature contradicts an engaged limit switch.
    #[test]
    fn resolution_is_consistent_with_extremes(
        sensor in arb_signature(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
        elapsed in 3_000u64..=100_000,
    ) {
        if let Ok(resolved) = resolve(sensor, current, last, elapsed, 3_000) {
            if sensor == SensorSignature::new(true, false) {
                prop_assert_eq!(resolved, DoorState::Open);
            }
            if sensor == SensorSignature::new(false, true) {
                prop_assert_eq!(resolved, DoorState::Closed);
            }
        }
    }
}

// ── Sequencer invariants ──────────────────────────────────────

proptest! {
    /// Every successful plan obeys the structural rules: at most three
    /// pulses, settles strictly interleaved (pulses == settles + 1 for any
    /// non-empty plan), never ending on a settle.
    #[test]
    fn plans_are_well_formed(
        dir in arb_direction(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
    ) {
        if let Ok(p) = plan(dir, current, last) {
            prop_assert!(p.pulse_count() <= 3);
            if !p.actions.is_empty() {
                prop_assert_eq!(p.pulse_count(), p.settle_count() + 1);
                prop_assert_ne!(p.actions.last(), Some(&PulseAction::Settle));
                prop_assert_eq!(p.actions.first(), Some(&PulseAction::Pulse));
            }
        }
    }

    /// A non-empty plan always ends in the requested transit state; an
    /// empty plan means the door is already at the target or moving there.
    #[test]
    fn plan_result_matches_request(
        dir in arb_direction(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
    ) {
        if let Ok(p) = plan(dir, current, last) {
            if p.actions.is_empty() {
                prop_assert!(current == dir.target() || current == dir.moving());
                prop_assert_eq!(p.result, current);
            } else {
                prop_assert_eq!(p.result, dir.moving());
            }
        }
    }

    /// Planning is direction-symmetric: closing a mirrored door takes
    /// exactly the same sequence as opening the original.
    #[test]
    fn close_is_the_mirror_of_open(
        current in arb_state(),
        last in proptest::option::of(arb_state()),
    ) {
        let open = plan(Direction::Open, current, last);
        let close = plan(Direction::Close, mirror(current), last.map(mirror));
        match (open, close) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.actions, b.actions);
                prop_assert_eq!(mirror(a.result), b.result);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "mirror divergence: {:?} vs {:?}", a, b),
        }
    }

    /// Idempotence: a request whose plan is empty stays empty when asked
    /// again from the same position.
    #[test]
    fn satisfied_requests_stay_satisfied(
        dir in arb_direction(),
        current in arb_state(),
        last in proptest::option::of(arb_state()),
    ) {
        if let Ok(first) = plan(dir, current, last) {
            if first.actions.is_empty() {
                let again = plan(dir, first.result, last).unwrap();
                prop_assert!(again.actions.is_empty());
            }
        }
    }
}
