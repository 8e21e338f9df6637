//! Partnet Network - The graph that schedules parts
//!
//! This crate implements the network side of the part system:
//! - Network elements and their total order
//! - Part network elements bound to a part type and target
//! - Channel name/id mappings
//! - The part sub-registry handed to part callbacks
//! - Network lifecycle (addition, kill, revive, removal) and the tick loop
//! - Cluster discovery over an adjacency interface

pub mod element;
pub mod part_element;
pub mod channel;
pub mod part_network;
pub mod network;
pub mod topology;

pub use element::*;
pub use part_element::*;
pub use channel::*;
pub use part_network::*;
pub use network::*;
pub use topology::*;
