//! Dumb hardware drivers, generic over `embedded-hal` traits.
//!
//! Drivers hold no policy — the application core decides *when* to pulse or
//! what a button press means; drivers only translate that into pin wiggles.

pub mod button;
pub mod relay;
