//! Part containers and the world interface
//!
//! A container holds up to one part state per face of a block position.
//! The world itself is external; the core only needs to find containers.

use std::collections::BTreeMap;

use partnet_core::{BlockPos, Facing, PartPos, PartnetError, PartnetResult};

use crate::PartState;

/// All parts mounted at one block position
#[derive(Clone, Debug, PartialEq)]
pub struct PartContainer {
    pos: BlockPos,
    parts: BTreeMap<Facing, PartState>,
}

impl PartContainer {
    pub fn new(pos: BlockPos) -> Self {
        PartContainer {
            pos,
            parts: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    pub fn part_state(&self, side: Facing) -> Option<&PartState> {
        self.parts.get(&side)
    }

    pub fn part_state_mut(&mut self, side: Facing) -> Option<&mut PartState> {
        self.parts.get_mut(&side)
    }

    /// Mount a part state on a free face
    pub fn insert(&mut self, side: Facing, state: PartState) -> PartnetResult<()> {
        if self.parts.contains_key(&side) {
            return Err(PartnetError::PartPosOccupied(PartPos::new(self.pos, side)));
        }
        self.parts.insert(side, state);
        Ok(())
    }

    pub fn remove(&mut self, side: Facing) -> Option<PartState> {
        self.parts.remove(&side)
    }

    pub fn has_part(&self, side: Facing) -> bool {
        self.parts.contains_key(&side)
    }

    pub fn sides(&self) -> impl Iterator<Item = Facing> + '_ {
        self.parts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facing, &PartState)> {
        self.parts.iter().map(|(side, state)| (*side, state))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Access to part containers in the world
pub trait PartWorld {
    fn part_container(&self, pos: BlockPos) -> Option<&PartContainer>;

    fn part_container_mut(&mut self, pos: BlockPos) -> Option<&mut PartContainer>;
}

/// Resolve the container at `pos`
pub fn resolve_container(world: &dyn PartWorld, pos: BlockPos) -> PartnetResult<&PartContainer> {
    world
        .part_container(pos)
        .ok_or(PartnetError::PartContainerNotFound(pos))
}

/// Resolve the part state mounted at `center`
pub fn resolve_state(world: &dyn PartWorld, center: PartPos) -> PartnetResult<&PartState> {
    resolve_container(world, center.pos)?
        .part_state(center.side)
        .ok_or(PartnetError::PartStateNotFound(center))
}

/// Resolve the part state mounted at `center` for mutation
pub fn resolve_state_mut(
    world: &mut dyn PartWorld,
    center: PartPos,
) -> PartnetResult<&mut PartState> {
    world
        .part_container_mut(center.pos)
        .ok_or(PartnetError::PartContainerNotFound(center.pos))?
        .part_state_mut(center.side)
        .ok_or(PartnetError::PartStateNotFound(center))
}
