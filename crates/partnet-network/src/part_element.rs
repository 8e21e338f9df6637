//! Part network element
//!
//! Binds a part type and a part target into a network node. The element is
//! a transient wrapper: every hook resolves the durable part state from the
//! world and delegates to the part type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use partnet_core::{BlockPos, ChannelId, PartPos, PartTarget, PartTypeId, PartnetResult};
use partnet_part::{
    resolve_container, resolve_state, resolve_state_mut, update_part, PartContainer, PartDrop,
    PartNetworkView, PartState, PartType, PartTypeRegistry, PartWorld,
};
use tracing::warn;

use crate::{ElementKey, NetworkElement, PartNetwork};

/// A part as a network member
#[derive(Clone)]
pub struct PartNetworkElement {
    part_type_id: PartTypeId,
    part: Arc<dyn PartType>,
    target: PartTarget,
}

impl PartNetworkElement {
    pub fn new(part_type_id: PartTypeId, part: Arc<dyn PartType>, target: PartTarget) -> Self {
        PartNetworkElement {
            part_type_id,
            part,
            target,
        }
    }

    /// Build the element for the part mounted at `center`
    pub fn from_world(
        registry: &PartTypeRegistry,
        world: &dyn PartWorld,
        center: PartPos,
    ) -> PartnetResult<Self> {
        let state = resolve_state(world, center)?;
        let part = registry.get(state.part_type())?.clone();
        let target = part.target(center, state);
        Ok(PartNetworkElement::new(state.part_type(), part, target))
    }

    #[inline]
    pub fn part(&self) -> &Arc<dyn PartType> {
        &self.part
    }

    #[inline]
    pub fn part_type_id(&self) -> PartTypeId {
        self.part_type_id
    }

    #[inline]
    pub fn target(&self) -> &PartTarget {
        &self.target
    }

    /// Container holding every part at the center position
    pub fn part_container<'w>(&self, world: &'w dyn PartWorld) -> PartnetResult<&'w PartContainer> {
        resolve_container(world, self.target.center_pos())
    }

    pub fn part_state<'w>(&self, world: &'w dyn PartWorld) -> PartnetResult<&'w PartState> {
        resolve_state(world, self.target.center())
    }

    fn part_state_mut<'w>(&self, world: &'w mut dyn PartWorld) -> PartnetResult<&'w mut PartState> {
        resolve_state_mut(world, self.target.center())
    }
}

impl NetworkElement for PartNetworkElement {
    fn key(&self) -> ElementKey {
        ElementKey::part(self.part_type_id, self.target.center())
    }

    fn update_interval(&self, world: &dyn PartWorld) -> PartnetResult<u32> {
        Ok(self.part.update_interval(self.part_state(world)?))
    }

    fn is_update(&self, world: &dyn PartWorld) -> PartnetResult<bool> {
        Ok(self.part.is_update(self.part_state(world)?))
    }

    fn priority(&self, world: &dyn PartWorld) -> PartnetResult<i32> {
        Ok(self.part.priority(self.part_state(world)?))
    }

    fn consumption_rate(&self, world: &dyn PartWorld) -> PartnetResult<i32> {
        Ok(self.part.consumption_rate(self.part_state(world)?))
    }

    fn update(&self, network: &mut PartNetwork, world: &mut dyn PartWorld) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        update_part(self.part.as_ref(), network, &self.target, state)
    }

    fn post_update(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
        updated: bool,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.post_update(network, &self.target, state, updated)
    }

    fn on_network_addition(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<bool> {
        let state = self.part_state_mut(world)?;
        let id = state.id();
        if !network.add_part(id, self.target.center()) {
            return Ok(false);
        }
        if let Some(channel) = state.channel() {
            if !network.channels().contains_id(channel) {
                warn!(part = %id, %channel, "clearing channel unknown to the joined network");
                state.set_channel(None);
            }
        }
        if let Err(e) = self.part.on_network_addition(network, &self.target, state) {
            network.remove_part(id);
            return Err(e);
        }
        Ok(true)
    }

    fn on_network_removal(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = match self.part_state_mut(world) {
            Ok(state) => state,
            Err(e) => {
                network.remove_part_at(self.target.center());
                return Err(e);
            }
        };
        network.remove_part(state.id());
        self.part.on_network_removal(network, &self.target, state)
    }

    fn before_network_kill(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.before_network_kill(network, &self.target, state)
    }

    fn after_network_alive(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.after_network_alive(network, &self.target, state)
    }

    fn after_network_re_alive(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.after_network_re_alive(network, &self.target, state)
    }

    fn on_pre_removed(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.on_pre_removed(network, &self.target, state)
    }

    fn on_post_removed(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part.on_post_removed(network, &self.target, state)
    }

    fn on_neighbor_block_change(
        &self,
        network: &mut PartNetwork,
        world: &mut dyn PartWorld,
        neighbor: BlockPos,
    ) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        self.part
            .on_block_neighbor_change(network, &self.target, state, neighbor)
    }

    fn on_channel_removed(&self, world: &mut dyn PartWorld, channel: ChannelId) -> PartnetResult<()> {
        let state = self.part_state_mut(world)?;
        if state.channel() == Some(channel) {
            state.set_channel(None);
        }
        Ok(())
    }

    fn add_drops(
        &self,
        world: &dyn PartWorld,
        drops: &mut Vec<PartDrop>,
        drop_main_element: bool,
    ) -> PartnetResult<()> {
        let state = self.part_state(world)?;
        self.part
            .add_drops(&self.target, state, drops, drop_main_element);
        Ok(())
    }
}

impl fmt::Debug for PartNetworkElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartNetworkElement")
            .field("part", &self.part.unlocalized_name())
            .field("part_type_id", &self.part_type_id)
            .field("target", &self.target)
            .finish()
    }
}

impl PartialEq for PartNetworkElement {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PartNetworkElement {}

impl Hash for PartNetworkElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for PartNetworkElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PartNetworkElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnet_core::{Facing, PartId, PartnetError};
    use std::collections::hash_map::DefaultHasher;
    use std::collections::BTreeMap;

    struct Lamp;

    impl PartType for Lamp {
        fn unlocalized_name(&self) -> &str {
            "parttype.partnet.lamp"
        }

        fn consumption_rate(&self, state: &PartState) -> i32 {
            state.priority().abs() + 1
        }
    }

    #[derive(Default)]
    struct World(BTreeMap<BlockPos, PartContainer>);

    impl PartWorld for World {
        fn part_container(&self, pos: BlockPos) -> Option<&PartContainer> {
            self.0.get(&pos)
        }

        fn part_container_mut(&mut self, pos: BlockPos) -> Option<&mut PartContainer> {
            self.0.get_mut(&pos)
        }
    }

    fn center(x: i32) -> PartPos {
        PartPos::new(BlockPos::new(x, 0, 0), Facing::Up)
    }

    fn world_with(parts: &[(PartPos, u64)]) -> World {
        let mut world = World::default();
        for (pos, id) in parts {
            world
                .0
                .entry(pos.pos)
                .or_insert_with(|| PartContainer::new(pos.pos))
                .insert(pos.side, PartState::new(PartId::new(*id), PartTypeId::new(0), 1))
                .unwrap();
        }
        world
    }

    fn element(pos: PartPos) -> PartNetworkElement {
        PartNetworkElement::new(PartTypeId::new(0), Arc::new(Lamp), PartTarget::for_part(pos, None))
    }

    fn hash_of(element: &PartNetworkElement) -> u64 {
        let mut hasher = DefaultHasher::new();
        element.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equal_identity_equal_hash_and_order() {
        let a = element(center(0));
        let b = PartNetworkElement::new(
            PartTypeId::new(0),
            Arc::new(Lamp),
            PartTarget::for_part(center(0), Some(Facing::East)),
        );

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(element(center(0)) < element(center(1)));
    }

    #[test]
    fn test_missing_container_is_lookup_fatal() {
        let world = World::default();
        let err = element(center(0)).part_state(&world).unwrap_err();
        assert_eq!(err, PartnetError::PartContainerNotFound(BlockPos::new(0, 0, 0)));
        assert!(err.is_lookup_fatal());
        assert!(element(center(0)).part_container(&world).is_err());
    }

    #[test]
    fn test_missing_state_is_lookup_fatal() {
        let world = world_with(&[(PartPos::new(BlockPos::new(0, 0, 0), Facing::Down), 1)]);
        let err = element(center(0)).is_update(&world).unwrap_err();
        assert_eq!(err, PartnetError::PartStateNotFound(center(0)));
    }

    #[test]
    fn test_addition_registers_then_rejects_collision() {
        let mut world = world_with(&[(center(0), 1), (center(1), 1)]);
        let mut network = PartNetwork::new(Default::default());

        assert!(element(center(0)).on_network_addition(&mut network, &mut world).unwrap());
        assert!(!element(center(1)).on_network_addition(&mut network, &mut world).unwrap());
        assert_eq!(network.part_count(), 1);
    }

    #[test]
    fn test_addition_clears_unknown_channel() {
        let mut world = world_with(&[(center(0), 1)]);
        world
            .part_container_mut(center(0).pos)
            .unwrap()
            .part_state_mut(Facing::Up)
            .unwrap()
            .set_channel(Some(ChannelId::new(4)));
        let mut network = PartNetwork::new(Default::default());

        element(center(0)).on_network_addition(&mut network, &mut world).unwrap();
        assert_eq!(element(center(0)).part_state(&world).unwrap().channel(), None);
    }

    #[test]
    fn test_removal_without_state_still_unregisters() {
        let mut world = world_with(&[(center(0), 3)]);
        let mut network = PartNetwork::new(Default::default());
        element(center(0)).on_network_addition(&mut network, &mut world).unwrap();

        world.0.clear();
        assert!(element(center(0)).on_network_removal(&mut network, &mut world).is_err());
        assert!(!network.contains_part(PartId::new(3)));
    }

    #[test]
    fn test_consumption_delegates() {
        let mut world = world_with(&[(center(0), 1)]);
        world
            .part_container_mut(center(0).pos)
            .unwrap()
            .part_state_mut(Facing::Up)
            .unwrap()
            .set_priority(-4);
        assert_eq!(element(center(0)).consumption_rate(&world).unwrap(), 5);
    }
}
