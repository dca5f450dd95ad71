//! Application service — the domain core.
//!
//! [`DoorService`] owns the state machine and the configuration, and drives
//! the ports. It is the single exclusive-access path to the door record:
//! both triggers (sensor edges and command requests) funnel through `&mut
//! self` methods, and pulse sequences run to completion inside them, so
//! nothing can interleave mid-sequence.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │       DoorService         │
//! ActuatorPort ◀──│  resolver · machine ·     │
//!                 │  sequencer                │
//!                 └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::DoorConfig;
use crate::door::machine::DoorStateMachine;
use crate::door::sequencer::{self, Direction, PulseAction, PulsePlan};
use crate::door::DoorState;
use crate::error::{Error, ResolveError, Result};

use super::commands::DoorCommand;
use super::events::{DoorEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort};

/// Orchestrates state resolution and command sequencing for one door.
pub struct DoorService {
    machine: DoorStateMachine,
    config: DoorConfig,
    /// Lifetime relay pulses issued, for telemetry.
    pulse_count: u64,
}

impl DoorService {
    /// Construct the service: seed the state machine from an initial sensor
    /// read and announce the starting state.
    ///
    /// A failed initial read is not fatal — the machine seeds as `Stopped`
    /// with no history, which keeps every command refused until the switches
    /// become readable.
    pub fn start(
        config: DoorConfig,
        hw: &mut impl SensorPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Self {
        let sig = match hw.read_limits() {
            Ok(sig) => sig,
            Err(e) => {
                warn!("initial limit read failed ({e}), seeding unknown");
                crate::door::SensorSignature::AMBIGUOUS
            }
        };
        let machine = DoorStateMachine::from_signature(sig, config.debounce_interval_ms, now_ms);
        let state = machine.current();
        info!("door service started in {}", state.name());
        sink.emit(&DoorEvent::Started(state));
        Self {
            machine,
            config,
            pulse_count: 0,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current committed (possibly optimistic) state.
    pub fn state(&self) -> DoorState {
        self.machine.current()
    }

    /// Build a telemetry snapshot from a fresh limit reading.
    pub fn telemetry(
        &self,
        limits: crate::door::SensorSignature,
        now_ms: u64,
    ) -> TelemetryData {
        TelemetryData {
            state: self.machine.current(),
            last_state: self.machine.last_state(),
            limits,
            state_age_ms: self.machine.state_age_ms(now_ms),
            pulse_count: self.pulse_count,
        }
    }

    // ── Sensor-edge path ──────────────────────────────────────

    /// Re-read the limit switches and reconcile state.
    ///
    /// Called on every limit-switch edge and on each control tick. Debounced
    /// readings are dropped inside the machine; an ambiguous reading is
    /// surfaced (and logged) but leaves the state untouched.
    pub fn poll_limits(
        &mut self,
        hw: &mut impl SensorPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Result<()> {
        let sig = hw.read_limits().map_err(Error::Sensor)?;
        if let Some(t) = self.machine.handle_sensor_event(sig, now_ms)? {
            info!("sensor commit: {} -> {}", t.from.name(), t.to.name());
            sink.emit(&DoorEvent::StateChanged(t));
        }
        Ok(())
    }

    // ── Command path ──────────────────────────────────────────

    /// Process an external command (button, RPC front end, scheduler).
    pub fn handle_command(
        &mut self,
        cmd: DoorCommand,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Result<DoorState> {
        match cmd {
            DoorCommand::RequestOpen => self.request(Direction::Open, hw, sink, now_ms),
            DoorCommand::RequestClose => self.request(Direction::Close, hw, sink, now_ms),
            DoorCommand::SyncState => {
                self.poll_limits(hw, sink, now_ms)?;
                Ok(self.machine.current())
            }
            DoorCommand::ForceState(state) => Ok(self.force_state(state, sink, now_ms)),
        }
    }

    /// Drive the door toward `direction`, returning the resulting logical
    /// state (possibly unchanged, when the request is already satisfied).
    pub fn request(
        &mut self,
        direction: Direction,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Result<DoorState> {
        // A state younger than the debounce window is still settling from
        // the previous transition; refuse to stack pulses on top of it.
        if self.machine.in_debounce_window(now_ms) {
            return Err(Error::Resolve(ResolveError::Debounce {
                elapsed_ms: self.machine.state_age_ms(now_ms),
            }));
        }

        // Re-resolve from fresh sensor data so the plan never acts on a
        // stale estimate. An ambiguous reading is expected mid-travel and
        // does not block the command.
        let sig = hw.read_limits().map_err(Error::Sensor)?;
        match self.machine.handle_sensor_event(sig, now_ms) {
            Ok(Some(t)) => {
                info!("pre-command commit: {} -> {}", t.from.name(), t.to.name());
                sink.emit(&DoorEvent::StateChanged(t));
            }
            Ok(None) | Err(ResolveError::Ambiguous) => {}
            Err(e @ ResolveError::Debounce { .. }) => return Err(Error::Resolve(e)),
        }

        let (current, last_state) = self.planning_view(now_ms);
        let plan = sequencer::plan(direction, current, last_state).map_err(Error::Command)?;

        if plan.actions.is_empty() {
            info!(
                "door already {} — {:?} request is a no-op",
                current.name(),
                direction
            );
            return Ok(current);
        }

        info!(
            "{:?}: {} pulse(s) from {} (last {:?}) -> {}",
            direction,
            plan.pulse_count(),
            current.name(),
            last_state.map(DoorState::name),
            plan.result.name()
        );
        self.execute(&plan, hw, now_ms)?;

        // Optimistic advance: sensors confirm later, or the resolver's
        // priority rules reconcile a mismatch.
        let t = self.machine.advance(plan.result, now_ms);
        sink.emit(&DoorEvent::StateChanged(t));
        Ok(self.machine.current())
    }

    /// Manual override: commit `state` without touching the relay. Restores
    /// the maintenance reset the controller has always had; also the escape
    /// hatch when both switches fail.
    pub fn force_state(
        &mut self,
        state: DoorState,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> DoorState {
        if state != self.machine.current() {
            warn!("state forced to {}", state.name());
            let t = self.machine.advance(state, now_ms);
            sink.emit(&DoorEvent::StateChanged(t));
        }
        self.machine.current()
    }

    // ── Internal ──────────────────────────────────────────────

    /// The (state, history) pair the sequencer should plan from. A transit
    /// estimate older than the transit timeout has expired — the door takes
    /// well under that to traverse, so something stopped it mid-travel.
    fn planning_view(&self, now_ms: u64) -> (DoorState, Option<DoorState>) {
        let current = self.machine.current();
        if matches!(current, DoorState::Opening | DoorState::Closing)
            && self.machine.state_age_ms(now_ms) > self.config.transit_timeout_ms
        {
            warn!(
                "{} estimate is {} ms old, planning as stopped mid-travel",
                current.name(),
                self.machine.state_age_ms(now_ms)
            );
            return (DoorState::Stopped, Some(current));
        }
        (current, self.machine.last_state())
    }

    /// Run the plan against the relay. A failed pulse invalidates the state
    /// estimate: the door may or may not have moved, and only a fresh
    /// limit-switch read can say.
    fn execute(
        &mut self,
        plan: &PulsePlan,
        hw: &mut impl ActuatorPort,
        now_ms: u64,
    ) -> Result<()> {
        for action in &plan.actions {
            match action {
                PulseAction::Pulse => {
                    if let Err(e) = hw.pulse(self.config.pulse_active_ms) {
                        warn!("pulse failed mid-sequence: {e}");
                        self.machine.invalidate(now_ms);
                        return Err(Error::Actuator(e));
                    }
                    self.pulse_count += 1;
                }
                PulseAction::Settle => hw.settle(self.config.settle_pause_ms),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::SensorSignature;
    use crate::error::ActuatorError;

    struct FakeHw {
        limits: SensorSignature,
        pulses: u32,
        settles: u32,
        fail_pulses: bool,
    }

    impl FakeHw {
        fn at(limits: SensorSignature) -> Self {
            Self {
                limits,
                pulses: 0,
                settles: 0,
                fail_pulses: false,
            }
        }
    }

    impl SensorPort for FakeHw {
        fn read_limits(&mut self) -> core::result::Result<SensorSignature, crate::error::SensorError> {
            Ok(self.limits)
        }
    }

    impl ActuatorPort for FakeHw {
        fn pulse(&mut self, _active_ms: u32) -> core::result::Result<(), ActuatorError> {
            if self.fail_pulses {
                return Err(ActuatorError::GpioWriteFailed);
            }
            self.pulses += 1;
            Ok(())
        }

        fn settle(&mut self, _pause_ms: u32) {
            self.settles += 1;
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &DoorEvent) {}
    }

    const CLOSED: SensorSignature = SensorSignature::new(false, true);

    #[test]
    fn open_from_closed_pulses_once_and_advances() {
        let mut hw = FakeHw::at(CLOSED);
        let mut sink = NullSink;
        let mut svc = DoorService::start(DoorConfig::default(), &mut hw, &mut sink, 0);

        let state = svc.request(Direction::Open, &mut hw, &mut sink, 10_000).unwrap();
        assert_eq!(state, DoorState::Opening);
        assert_eq!(hw.pulses, 1);
        assert_eq!(hw.settles, 0);
    }

    #[test]
    fn command_inside_debounce_window_is_refused() {
        let mut hw = FakeHw::at(CLOSED);
        let mut sink = NullSink;
        let mut svc = DoorService::start(DoorConfig::default(), &mut hw, &mut sink, 0);

        let got = svc.request(Direction::Open, &mut hw, &mut sink, 1_000);
        assert!(matches!(
            got,
            Err(Error::Resolve(ResolveError::Debounce { elapsed_ms: 1_000 }))
        ));
        assert_eq!(hw.pulses, 0);
    }

    #[test]
    fn failed_pulse_invalidates_state() {
        let mut hw = FakeHw::at(CLOSED);
        let mut sink = NullSink;
        let mut svc = DoorService::start(DoorConfig::default(), &mut hw, &mut sink, 0);

        hw.fail_pulses = true;
        let got = svc.request(Direction::Open, &mut hw, &mut sink, 10_000);
        assert_eq!(got, Err(Error::Actuator(ActuatorError::GpioWriteFailed)));
        assert_eq!(svc.state(), DoorState::Stopped);

        // History is gone: the next command is a hard refusal, zero pulses.
        hw.fail_pulses = false;
        hw.limits = SensorSignature::AMBIGUOUS;
        let got = svc.request(Direction::Close, &mut hw, &mut sink, 20_000);
        assert_eq!(
            got,
            Err(Error::Command(crate::error::CommandError::UnknownTransition))
        );
        assert_eq!(hw.pulses, 0);
    }

    #[test]
    fn force_state_commits_without_pulsing() {
        let mut hw = FakeHw::at(CLOSED);
        let mut sink = NullSink;
        let mut svc = DoorService::start(DoorConfig::default(), &mut hw, &mut sink, 0);

        let state = svc.force_state(DoorState::Open, &mut sink, 5_000);
        assert_eq!(state, DoorState::Open);
        assert_eq!(hw.pulses, 0);
    }
}
