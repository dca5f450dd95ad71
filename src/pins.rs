//! GPIO pin assignments for the bay controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door opener relay
// ---------------------------------------------------------------------------

/// Digital output driving the momentary relay wired across the opener's
/// wall-button terminals (active HIGH energises the coil).
pub const RELAY_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Limit switches (reed switches, active-low with pull-up)
// ---------------------------------------------------------------------------

/// Top-of-travel reed switch. LOW = door fully open (magnet present).
pub const LIMIT_OPEN_GPIO: i32 = 25;
/// Bottom-of-travel reed switch. LOW = door fully closed (magnet present).
pub const LIMIT_CLOSED_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary wall button for manual open/close toggling.
pub const BUTTON_GPIO: i32 = 27;
