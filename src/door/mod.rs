//! Door domain core: states, sensor signatures, and the fixed definition
//! table the resolver and sequencer work from.
//!
//! ```text
//!            (1,0)                        (0,1)
//!   OPEN ◀──────────── Opening  Closing ────────────▶ CLOSED
//!     │                   ▲        ▲                     │
//!     │ pulse             │ (0,0)  │ (0,0)         pulse │
//!     └──▶ Closing        │        │         Opening ◀───┘
//!                       CLOSED    OPEN
//! ```
//!
//! Two limit sensors give each extreme a unique signature; every transit
//! state shares `(false, false)`. Breaking that ambiguity from history is the
//! resolver's job ([`resolver`]); turning intents into relay pulses is the
//! sequencer's ([`sequencer`]).

pub mod machine;
pub mod resolver;
pub mod sequencer;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The five logical door positions.
/// Must stay in sync with [`STATE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DoorState {
    /// At the top limit — uniquely identified by the sensors.
    Open = 0,
    /// At the bottom limit — uniquely identified by the sensors.
    Closed = 1,
    /// Travelling up. Shares the ambiguous transit signature.
    Opening = 2,
    /// Travelling down. Shares the ambiguous transit signature.
    Closing = 3,
    /// Halted mid-travel. Shares the ambiguous transit signature.
    Stopped = 4,
}

impl DoorState {
    /// Total number of states — used to size the definition table.
    pub const COUNT: usize = 5;

    /// `Open` / `Closed`: identifiable from the sensors alone.
    pub const fn is_extreme(self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }

    /// `Opening` / `Closing` / `Stopped`: share one sensor signature.
    pub const fn is_transit(self) -> bool {
        !self.is_extreme()
    }

    /// Human-readable name, for logs and telemetry.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Opening => "Opening",
            Self::Closing => "Closing",
            Self::Stopped => "Stopped",
        }
    }

    /// The value the home-automation hub uses for `CurrentDoorState` in
    /// webhook payloads. The hub expects the digit as a string.
    pub const fn hub_value(self) -> &'static str {
        match self {
            Self::Open => "0",
            Self::Closed => "1",
            Self::Opening => "2",
            Self::Closing => "3",
            Self::Stopped => "4",
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor signature
// ---------------------------------------------------------------------------

/// One reading of both limit switches. `true` = switch engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorSignature {
    /// Top-of-travel switch (door fully open).
    pub top: bool,
    /// Bottom-of-travel switch (door fully closed).
    pub bottom: bool,
}

impl SensorSignature {
    /// The signature every transit state shares: neither limit engaged.
    pub const AMBIGUOUS: Self = Self {
        top: false,
        bottom: false,
    };

    pub const fn new(top: bool, bottom: bool) -> Self {
        Self { top, bottom }
    }

    /// Both switches engaged at once — physically impossible; indicates a
    /// wiring or magnet fault. Never resolves to a state.
    pub const fn is_conflicting(self) -> bool {
        self.top && self.bottom
    }
}

// ---------------------------------------------------------------------------
// State definition table
// ---------------------------------------------------------------------------

/// Static description of one state: its sensor signature and, for transit
/// states that imply motion, the extreme the door just departed.
pub struct StateDefinition {
    pub state: DoorState,
    pub signature: SensorSignature,
    /// The extreme state this transit logically follows
    /// (`Opening` follows `Closed`, `Closing` follows `Open`).
    pub follows: Option<DoorState>,
}

/// The fixed definition table, indexed by `DoorState as usize`.
/// The state set is closed; this never changes at runtime.
pub const STATE_TABLE: [StateDefinition; DoorState::COUNT] = [
    StateDefinition {
        state: DoorState::Open,
        signature: SensorSignature::new(true, false),
        follows: None,
    },
    StateDefinition {
        state: DoorState::Closed,
        signature: SensorSignature::new(false, true),
        follows: None,
    },
    StateDefinition {
        state: DoorState::Opening,
        signature: SensorSignature::AMBIGUOUS,
        follows: Some(DoorState::Closed),
    },
    StateDefinition {
        state: DoorState::Closing,
        signature: SensorSignature::AMBIGUOUS,
        follows: Some(DoorState::Open),
    },
    StateDefinition {
        state: DoorState::Stopped,
        signature: SensorSignature::AMBIGUOUS,
        follows: None,
    },
];
