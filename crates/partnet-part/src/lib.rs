//! Partnet Part - Part instances, part types and aspects
//!
//! This crate implements everything a single part needs:
//! - Part state (durable per-instance configuration) and its persisted record
//! - Part types (shared stateless behavior) and their registry
//! - Aspects (typed read/write capabilities) with configurable properties
//! - Part containers and the world interface used to resolve states
//! - The network view handed to part and aspect callbacks

pub mod property;
pub mod aspect;
pub mod state;
pub mod part_type;
pub mod registry;
pub mod container;
pub mod view;

pub use property::*;
pub use aspect::*;
pub use state::*;
pub use part_type::*;
pub use registry::*;
pub use container::*;
pub use view::*;
