//! Partnet Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the part network:
//! - Identifiers (PartId, PartTypeId, ChannelId, NetworkId, ValueId)
//! - Positions and facings (BlockPos, Facing, PartPos)
//! - Part addressing (PartTarget)
//! - Value types and values exposed through aspects
//! - Localized messages and the core error type

pub mod id;
pub mod pos;
pub mod target;
pub mod value;
pub mod message;
pub mod error;

pub use id::*;
pub use pos::*;
pub use target::*;
pub use value::*;
pub use message::*;
pub use error::*;
