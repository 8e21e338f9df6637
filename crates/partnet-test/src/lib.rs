//! Partnet Test Harness - Scenario testing across the part network crates
//!
//! This crate provides:
//! - A hook journal recording every part callback
//! - Recorder part types with tunable behavior
//! - A scenario builder on top of the simulation driver

pub mod journal;
pub mod parts;
pub mod scenario;

pub use journal::*;
pub use parts::*;
pub use scenario::*;
