//! Part sub-registry of a network
//!
//! Tracks which part ids are members, where they are mounted, and owns the
//! network's channel map. Part callbacks see it through `PartNetworkView`.

use std::collections::BTreeMap;

use partnet_core::{ChannelId, NetworkId, PartId, PartPos};
use partnet_part::PartNetworkView;

use crate::ChannelMappings;

/// Part registry plus channel map of one network
#[derive(Clone, Debug, Default)]
pub struct PartNetwork {
    id: NetworkId,
    parts: BTreeMap<PartId, PartPos>,
    by_pos: BTreeMap<PartPos, PartId>,
    channels: ChannelMappings,
}

impl PartNetwork {
    pub fn new(id: NetworkId) -> Self {
        PartNetwork {
            id,
            ..PartNetwork::default()
        }
    }

    pub fn channels(&self) -> &ChannelMappings {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut ChannelMappings {
        &mut self.channels
    }

    /// Unregister whatever part is registered at `pos`
    pub fn remove_part_at(&mut self, pos: PartPos) -> Option<PartId> {
        let id = self.by_pos.remove(&pos)?;
        self.parts.remove(&id);
        Some(id)
    }

    pub fn part_at(&self, pos: PartPos) -> Option<PartId> {
        self.by_pos.get(&pos).copied()
    }

    /// Registered parts in id order
    pub fn parts(&self) -> impl Iterator<Item = (PartId, PartPos)> + '_ {
        self.parts.iter().map(|(id, pos)| (*id, *pos))
    }
}

impl PartNetworkView for PartNetwork {
    fn network_id(&self) -> NetworkId {
        self.id
    }

    fn add_part(&mut self, id: PartId, pos: PartPos) -> bool {
        if self.parts.contains_key(&id) || self.by_pos.contains_key(&pos) {
            return false;
        }
        self.parts.insert(id, pos);
        self.by_pos.insert(pos, id);
        true
    }

    fn remove_part(&mut self, id: PartId) -> bool {
        match self.parts.remove(&id) {
            Some(pos) => {
                self.by_pos.remove(&pos);
                true
            }
            None => false,
        }
    }

    fn contains_part(&self, id: PartId) -> bool {
        self.parts.contains_key(&id)
    }

    fn part_pos(&self, id: PartId) -> Option<PartPos> {
        self.parts.get(&id).copied()
    }

    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn channel_id(&self, name: &str) -> Option<ChannelId> {
        self.channels.id(name)
    }

    fn channel_name(&self, id: ChannelId) -> Option<&str> {
        self.channels.name(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnet_core::{BlockPos, Facing};

    fn pos(x: i32) -> PartPos {
        PartPos::new(BlockPos::new(x, 0, 0), Facing::Up)
    }

    #[test]
    fn test_id_collision_rejected() {
        let mut network = PartNetwork::new(NetworkId::new(1));
        assert!(network.add_part(PartId::new(1), pos(0)));
        assert!(!network.add_part(PartId::new(1), pos(1)));
        assert!(!network.add_part(PartId::new(2), pos(0)));
        assert_eq!(network.part_count(), 1);
    }

    #[test]
    fn test_remove_by_id_and_pos() {
        let mut network = PartNetwork::new(NetworkId::new(1));
        network.add_part(PartId::new(1), pos(0));
        network.add_part(PartId::new(2), pos(1));

        assert!(network.remove_part(PartId::new(1)));
        assert!(!network.remove_part(PartId::new(1)));
        assert_eq!(network.part_at(pos(0)), None);

        assert_eq!(network.remove_part_at(pos(1)), Some(PartId::new(2)));
        assert!(!network.contains_part(PartId::new(2)));
        assert_eq!(network.part_count(), 0);
    }
}
