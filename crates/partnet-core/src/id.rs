//! Identity types for the part network
//!
//! Part ids are 64-bit and unique for the lifetime of a world. Type, channel
//! and value ids are small dense integers handed out by their owning registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Part instance identity - unique per placed part
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PartId(pub u64);

impl PartId {
    pub const ZERO: PartId = PartId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        PartId(id)
    }

    /// The id following this one
    #[inline]
    pub fn next(self) -> Self {
        PartId(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part({:016x})", self.0)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Part type identity - assigned densely by the part type registry
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PartTypeId(pub u32);

impl PartTypeId {
    #[inline]
    pub fn new(id: u32) -> Self {
        PartTypeId(id)
    }
}

impl fmt::Debug for PartTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartType({})", self.0)
    }
}

impl fmt::Display for PartTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel identity - unique within one network's channel map
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl ChannelId {
    #[inline]
    pub fn new(id: u32) -> Self {
        ChannelId(id)
    }

    /// Encode an optional channel the way it is persisted (-1 = none)
    pub fn to_persisted(channel: Option<ChannelId>) -> i32 {
        match channel {
            Some(ChannelId(id)) => i32::try_from(id).unwrap_or(i32::MAX),
            None => -1,
        }
    }

    /// Decode a persisted channel value (negative = none)
    pub fn from_persisted(raw: i32) -> Option<ChannelId> {
        u32::try_from(raw).ok().map(ChannelId)
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network identity - one per discovered cluster
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NetworkId(pub u64);

impl NetworkId {
    #[inline]
    pub fn new(id: u64) -> Self {
        NetworkId(id)
    }
}

impl fmt::Debug for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network({})", self.0)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque key of one synchronized value between simulation and presentation
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ValueId(pub u32);

impl ValueId {
    #[inline]
    pub fn new(id: u32) -> Self {
        ValueId(id)
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.0)
    }
}
