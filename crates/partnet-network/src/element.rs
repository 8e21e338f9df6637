//! Network elements
//!
//! Every schedulable node of a network is a `NetworkElement`. Identity,
//! equality, hashing and ordering all derive from its [`ElementKey`].

use std::fmt;

use partnet_core::{BlockPos, ChannelId, PartPos, PartTypeId, PartnetResult};
use partnet_part::{PartDrop, PartWorld};

use crate::PartNetwork;

/// Identity of a network element.
///
/// Part elements order by (part type, center position, center facing) and
/// sort before every other element kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKey {
    Part {
        part_type: PartTypeId,
        center: PartPos,
    },
    Other {
        kind: u32,
        id: u64,
    },
}

impl ElementKey {
    pub fn part(part_type: PartTypeId, center: PartPos) -> Self {
        ElementKey::Part { part_type, center }
    }

    /// Block position the element is mounted at, if any
    pub fn position(&self) -> Option<BlockPos> {
        match self {
            ElementKey::Part { center, .. } => Some(center.pos),
            ElementKey::Other { .. } => None,
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Part { part_type, center } => write!(f, "part:{}:{}", part_type, center),
            ElementKey::Other { kind, id } => write!(f, "element:{}:{}", kind, id),
        }
    }
}

/// Schedulable, lifecycle-bound node of a network
pub trait NetworkElement: fmt::Debug + Send {
    fn key(&self) -> ElementKey;

    fn update_interval(&self, world: &dyn PartWorld) -> PartnetResult<u32>;

    fn is_update(&self, world: &dyn PartWorld) -> PartnetResult<bool>;

    /// Scheduling priority; lower runs first within a tick
    fn priority(&self, _world: &dyn PartWorld) -> PartnetResult<i32> {
        Ok(0)
    }

    fn consumption_rate(&self, _world: &dyn PartWorld) -> PartnetResult<i32> {
        Ok(0)
    }

    fn update(&self, network: &mut PartNetwork, world: &mut dyn PartWorld) -> PartnetResult<()>;

    fn post_update(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
        updated: bool,
    ) -> PartnetResult<()>;

    /// Join `network`. Returns false if the element's id is already taken.
    fn on_network_addition(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<bool>;

    fn on_network_removal(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()>;

    fn before_network_kill(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn after_network_alive(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn after_network_re_alive(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_pre_removed(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_post_removed(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_neighbor_block_change(
        &self,
        _network: &mut PartNetwork,
        _world: &mut dyn PartWorld,
        _neighbor: BlockPos,
    ) -> PartnetResult<()> {
        Ok(())
    }

    /// Drop every reference to a channel that no longer exists
    fn on_channel_removed(
        &self,
        _world: &mut dyn PartWorld,
        _channel: ChannelId,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn add_drops(
        &self,
        _world: &dyn PartWorld,
        _drops: &mut Vec<PartDrop>,
        _drop_main_element: bool,
    ) -> PartnetResult<()> {
        Ok(())
    }
}
