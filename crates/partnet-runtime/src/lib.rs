//! Partnet Runtime - Driving part networks
//!
//! This crate connects the part network to the outside:
//! - Runtime configuration and tracing setup
//! - Last-value synchronization towards a presentation side
//! - Configuration intents flowing back from it
//! - Part settings sessions and forms
//! - Aspect listings for part overviews
//! - The `Simulation` driver owning world, registry and networks

pub mod config;
pub mod error;
pub mod intent;
pub mod listing;
pub mod settings;
pub mod simulation;
pub mod sync;
pub mod telemetry;
pub mod world;

pub use config::*;
pub use error::*;
pub use intent::*;
pub use listing::*;
pub use settings::*;
pub use simulation::*;
pub use sync::*;
pub use telemetry::*;
pub use world::*;
