//! Inbound commands to the application service.
//!
//! Actions requested by the outside world (wall button, RPC front end,
//! scheduler) that the [`DoorService`](super::service::DoorService)
//! interprets and acts upon.

use crate::door::sequencer::Direction;
use crate::door::DoorState;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    /// Drive the door toward fully open.
    RequestOpen,

    /// Drive the door toward fully closed.
    RequestClose,

    /// Re-read the limit switches and reconcile state immediately.
    SyncState,

    /// Manual state override (maintenance / recovery only): commit `state`
    /// without touching the relay.
    ForceState(DoorState),
}

impl DoorCommand {
    /// The travel direction a command implies, if any.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::RequestOpen => Some(Direction::Open),
            Self::RequestClose => Some(Direction::Close),
            Self::SyncState | Self::ForceState(_) => None,
        }
    }
}
