//! In-memory world
//!
//! Part containers keyed by block position, plus cable positions that
//! connect parts without holding any themselves.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use partnet_core::{BlockPos, PartPos, PartTarget, PartnetResult};
use partnet_network::Adjacency;
use partnet_part::{PartContainer, PartState, PartWorld};

#[derive(Clone, Debug, Default)]
pub struct InMemoryWorld {
    containers: BTreeMap<BlockPos, PartContainer>,
    cables: BTreeSet<BlockPos>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        InMemoryWorld::default()
    }

    /// Mount a part state, creating the container if needed
    pub fn insert_part(&mut self, center: PartPos, state: PartState) -> PartnetResult<()> {
        self.containers
            .entry(center.pos)
            .or_insert_with(|| PartContainer::new(center.pos))
            .insert(center.side, state)
    }

    /// Unmount a part state; empty containers are dropped
    pub fn remove_part(&mut self, center: PartPos) -> Option<PartState> {
        let container = self.containers.get_mut(&center.pos)?;
        let state = container.remove(center.side);
        if container.is_empty() {
            self.containers.remove(&center.pos);
        }
        state
    }

    pub fn add_cable(&mut self, pos: BlockPos) -> bool {
        self.cables.insert(pos)
    }

    pub fn remove_cable(&mut self, pos: BlockPos) -> bool {
        self.cables.remove(&pos)
    }

    pub fn is_cable(&self, pos: BlockPos) -> bool {
        self.cables.contains(&pos)
    }

    /// Every mounted part position
    pub fn parts(&self) -> impl Iterator<Item = PartPos> + '_ {
        self.containers
            .values()
            .flat_map(|c| c.sides().map(move |side| PartPos::new(c.pos(), side)))
    }

    fn targets_at(&self, pos: BlockPos, out: &mut BTreeSet<PartTarget>) {
        if let Some(container) = self.containers.get(&pos) {
            for (side, state) in container.iter() {
                out.insert(PartTarget::for_part(PartPos::new(pos, side), state.side_override()));
            }
        }
    }
}

impl PartWorld for InMemoryWorld {
    fn part_container(&self, pos: BlockPos) -> Option<&PartContainer> {
        self.containers.get(&pos)
    }

    fn part_container_mut(&mut self, pos: BlockPos) -> Option<&mut PartContainer> {
        self.containers.get_mut(&pos)
    }
}

impl Adjacency for InMemoryWorld {
    /// Parts at `pos` and next to it. Cable runs are followed to their ends.
    fn neighbors(&self, pos: BlockPos) -> BTreeSet<PartTarget> {
        let mut out = BTreeSet::new();
        self.targets_at(pos, &mut out);

        let mut seen = BTreeSet::from([pos]);
        let mut queue: VecDeque<BlockPos> = pos.neighbors().collect();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            self.targets_at(next, &mut out);
            if self.is_cable(next) {
                queue.extend(next.neighbors());
            }
        }
        out
    }
}
