//! BayDoor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod door;
pub mod error;
pub mod events;
pub mod pins;

// Hardware-facing modules; the actual device implementations are guarded
// by cfg attributes inside, the generic parts are host-testable.
pub mod adapters;
pub mod drivers;
pub mod sensors;
