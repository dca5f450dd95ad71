//! Application core — pure domain logic, zero I/O.
//!
//! Business rules for the door controller: state resolution, command
//! sequencing, and notification. All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real pins or a real relay.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
