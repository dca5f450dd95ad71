//! Door position sensing.

pub mod limit_switch;

pub use limit_switch::LimitSwitches;
