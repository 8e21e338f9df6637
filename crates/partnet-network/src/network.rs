//! Network - lifecycle and per-tick scheduling of members
//!
//! A network drives its members through
//! `Unregistered -> Added -> {Alive <-> Killed} -> Removed`.
//!
//! Each tick, while alive, members run in ascending `(priority, key)` order.
//! A member whose state cannot be resolved is logged and skipped; the rest
//! of the tick continues.

use std::collections::BTreeMap;

use partnet_core::{BlockPos, ChannelId, NetworkId, PartnetError, PartnetResult};
use partnet_part::{PartDrop, PartWorld};
use tracing::{debug, info, warn};

use crate::{ChannelMappings, ElementKey, NetworkElement, PartNetwork};

/// Lifecycle phase of the network as a whole
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkPhase {
    /// Members are being added, nothing is driven yet
    Forming,
    /// Members are updated every tick
    Alive,
    /// Temporarily invalid; member states are kept
    Killed,
}

/// Lifecycle phase of one registered member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberPhase {
    Added,
    Alive,
    Killed,
}

/// Outcome of adding an element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addition {
    Added,
    /// The element identity or its part id is already registered
    Rejected,
}

struct Member {
    element: Box<dyn NetworkElement>,
    phase: MemberPhase,
    /// Set once the member received its first alive notification
    activated: bool,
    last_update: Option<u64>,
}

/// Counters for one tick
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Members whose `update` ran
    pub updated: u32,
    /// Members that were not due or did not want an update
    pub idle: u32,
    /// Members skipped because a hook failed
    pub failed: u32,
    /// Summed consumption rate of the members that ran
    pub consumption: i64,
    /// Keys in the order members were visited
    pub order: Vec<ElementKey>,
}

/// Running totals over the network lifetime
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub ticks: u64,
    pub updates: u64,
    pub failures: u64,
    pub kills: u64,
    pub revivals: u64,
    pub consumed: i64,
}

/// A connected cluster of network elements
pub struct Network {
    id: NetworkId,
    phase: NetworkPhase,
    members: BTreeMap<ElementKey, Member>,
    part_network: PartNetwork,
    tick: u64,
    stats: NetworkStats,
}

impl Network {
    pub fn new(id: NetworkId) -> Self {
        Network {
            id,
            phase: NetworkPhase::Forming,
            members: BTreeMap::new(),
            part_network: PartNetwork::new(id),
            tick: 0,
            stats: NetworkStats::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> NetworkId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> NetworkPhase {
        self.phase
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.phase == NetworkPhase::Alive
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn part_network(&self) -> &PartNetwork {
        &self.part_network
    }

    pub fn channels(&self) -> &ChannelMappings {
        self.part_network.channels()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: &ElementKey) -> bool {
        self.members.contains_key(key)
    }

    pub fn member_phase(&self, key: &ElementKey) -> Option<MemberPhase> {
        self.members.get(key).map(|m| m.phase)
    }

    /// Member keys in element order
    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.members.keys()
    }

    pub fn element(&self, key: &ElementKey) -> Option<&dyn NetworkElement> {
        self.members.get(key).map(|m| m.element.as_ref())
    }

    /// Register an element.
    ///
    /// On rejection the element is not scheduled and nothing is kept. Joining
    /// an alive network immediately makes the member alive.
    pub fn add_element(
        &mut self,
        element: Box<dyn NetworkElement>,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<Addition> {
        let key = element.key();
        if self.members.contains_key(&key) {
            debug!(network = %self.id, element = %key, "element already a member");
            return Ok(Addition::Rejected);
        }
        if !element.on_network_addition(&mut self.part_network, world)? {
            debug!(network = %self.id, element = %key, "part id already registered");
            return Ok(Addition::Rejected);
        }

        let mut member = Member {
            element,
            phase: MemberPhase::Added,
            activated: false,
            last_update: None,
        };
        match self.phase {
            NetworkPhase::Alive => {
                if let Err(e) = member.element.after_network_alive(&mut self.part_network, world) {
                    warn!(network = %self.id, element = %key, error = %e, "after_network_alive failed");
                }
                member.phase = MemberPhase::Alive;
                member.activated = true;
            }
            NetworkPhase::Killed => member.phase = MemberPhase::Killed,
            NetworkPhase::Forming => {}
        }
        debug!(network = %self.id, element = %key, "element added");
        self.members.insert(key, member);
        Ok(Addition::Added)
    }

    /// Remove a member for good: pre-removal, detachment, post-removal.
    ///
    /// The member is always detached, even when one of its hooks fails.
    pub fn remove_element(
        &mut self,
        key: &ElementKey,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<Box<dyn NetworkElement>> {
        let member = self
            .members
            .remove(key)
            .ok_or_else(|| PartnetError::ElementNotFound(key.to_string()))?;
        let element = member.element;

        if let Err(e) = element.on_pre_removed(&mut self.part_network, world) {
            warn!(network = %self.id, element = %key, error = %e, "on_pre_removed failed");
        }
        if let Err(e) = element.on_network_removal(&mut self.part_network, world) {
            warn!(network = %self.id, element = %key, error = %e, "on_network_removal failed");
        }
        if let Err(e) = element.on_post_removed(&mut self.part_network, world) {
            warn!(network = %self.id, element = %key, error = %e, "on_post_removed failed");
        }
        debug!(network = %self.id, element = %key, "element removed");
        Ok(element)
    }

    /// Drop a member from this network only, e.g. to move it to another one
    pub fn detach_element(
        &mut self,
        key: &ElementKey,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<Box<dyn NetworkElement>> {
        let member = self
            .members
            .remove(key)
            .ok_or_else(|| PartnetError::ElementNotFound(key.to_string()))?;
        if let Err(e) = member.element.on_network_removal(&mut self.part_network, world) {
            warn!(network = %self.id, element = %key, error = %e, "on_network_removal failed");
        }
        Ok(member.element)
    }

    /// Swap a member's element for a rebuilt one with the same key.
    ///
    /// Lifecycle phase and update bookkeeping are kept; no hooks run.
    pub fn replace_element(&mut self, element: Box<dyn NetworkElement>) -> PartnetResult<()> {
        let key = element.key();
        let member = self
            .members
            .get_mut(&key)
            .ok_or_else(|| PartnetError::ElementNotFound(key.to_string()))?;
        member.element = element;
        Ok(())
    }

    /// Collect the drops of a member
    pub fn drops_of(
        &self,
        key: &ElementKey,
        world: &dyn PartWorld,
        drop_main_element: bool,
    ) -> PartnetResult<Vec<PartDrop>> {
        let member = self
            .members
            .get(key)
            .ok_or_else(|| PartnetError::ElementNotFound(key.to_string()))?;
        let mut drops = Vec::new();
        member.element.add_drops(world, &mut drops, drop_main_element)?;
        Ok(drops)
    }

    /// Invalidate the network. Every member is told before updates stop.
    pub fn kill(&mut self, world: &mut dyn PartWorld) -> PartnetResult<()> {
        if self.phase == NetworkPhase::Killed {
            return Ok(());
        }
        for (key, member) in self.members.iter_mut() {
            if let Err(e) = member.element.before_network_kill(&mut self.part_network, world) {
                warn!(network = %self.id, element = %key, error = %e, "before_network_kill failed");
            }
            member.phase = MemberPhase::Killed;
        }
        self.phase = NetworkPhase::Killed;
        self.stats.kills += 1;
        info!(network = %self.id, members = self.members.len(), "network killed");
        Ok(())
    }

    /// Bring the network (back) to life.
    ///
    /// Members activated before get `after_network_re_alive`; members that
    /// were never alive get `after_network_alive`.
    pub fn revive(&mut self, world: &mut dyn PartWorld) -> PartnetResult<()> {
        if self.phase == NetworkPhase::Alive {
            return Ok(());
        }
        let restoring = self.phase == NetworkPhase::Killed;
        for (key, member) in self.members.iter_mut() {
            let result = if member.activated {
                member.element.after_network_re_alive(&mut self.part_network, world)
            } else {
                member.element.after_network_alive(&mut self.part_network, world)
            };
            if let Err(e) = result {
                warn!(network = %self.id, element = %key, error = %e, "alive notification failed");
            }
            member.activated = true;
            member.phase = MemberPhase::Alive;
        }
        self.phase = NetworkPhase::Alive;
        if restoring {
            self.stats.revivals += 1;
        }
        info!(network = %self.id, members = self.members.len(), restoring, "network alive");
        Ok(())
    }

    /// Advance one tick.
    ///
    /// Does nothing unless the network is alive.
    pub fn tick(&mut self, world: &mut dyn PartWorld) -> TickReport {
        if self.phase != NetworkPhase::Alive {
            return TickReport {
                tick: self.tick,
                ..TickReport::default()
            };
        }
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        for key in self.schedule(world, &mut report) {
            let Some(member) = self.members.get_mut(&key) else {
                continue;
            };
            report.order.push(key);

            let due = match Self::is_due(member, self.tick, world) {
                Ok(due) => due,
                Err(e) => {
                    warn!(network = %self.id, element = %key, error = %e, "skipping member");
                    report.failed += 1;
                    continue;
                }
            };

            let mut updated = false;
            if due {
                if let Err(e) = member.element.update(&mut self.part_network, world) {
                    warn!(network = %self.id, element = %key, error = %e, "update failed");
                    report.failed += 1;
                    continue;
                }
                member.last_update = Some(self.tick);
                updated = true;
                report.updated += 1;
                match member.element.consumption_rate(world) {
                    Ok(rate) => report.consumption += i64::from(rate),
                    Err(e) => warn!(network = %self.id, element = %key, error = %e, "consumption lookup failed"),
                }
            } else {
                report.idle += 1;
            }

            if let Err(e) = member.element.post_update(&mut self.part_network, world, updated) {
                warn!(network = %self.id, element = %key, error = %e, "post_update failed");
                report.failed += 1;
            }
        }

        self.stats.ticks += 1;
        self.stats.updates += u64::from(report.updated);
        self.stats.failures += u64::from(report.failed);
        self.stats.consumed += report.consumption;
        report
    }

    /// Member keys sorted by (priority, key) for this tick
    fn schedule(&self, world: &dyn PartWorld, report: &mut TickReport) -> Vec<ElementKey> {
        let mut order: Vec<(i32, ElementKey)> = Vec::with_capacity(self.members.len());
        for (key, member) in &self.members {
            match member.element.priority(world) {
                Ok(priority) => order.push((priority, *key)),
                Err(e) => {
                    warn!(network = %self.id, element = %key, error = %e, "skipping member");
                    report.failed += 1;
                }
            }
        }
        order.sort();
        order.into_iter().map(|(_, key)| key).collect()
    }

    fn is_due(member: &Member, tick: u64, world: &dyn PartWorld) -> PartnetResult<bool> {
        if !member.element.is_update(world)? {
            return Ok(false);
        }
        let interval = u64::from(member.element.update_interval(world)?.max(1));
        Ok(match member.last_update {
            None => true,
            Some(last) => tick - last >= interval,
        })
    }

    /// Forward a neighbor change to every member mounted at `pos`
    pub fn on_neighbor_block_change(
        &mut self,
        pos: BlockPos,
        neighbor: BlockPos,
        world: &mut dyn PartWorld,
    ) {
        for (key, member) in self.members.iter() {
            if key.position() != Some(pos) {
                continue;
            }
            if let Err(e) = member
                .element
                .on_neighbor_block_change(&mut self.part_network, world, neighbor)
            {
                warn!(network = %self.id, element = %key, error = %e, "neighbor change failed");
            }
        }
    }

    /// Summed consumption rate of all members
    pub fn consumption_rate(&self, world: &dyn PartWorld) -> i64 {
        self.members
            .iter()
            .filter_map(|(key, member)| match member.element.consumption_rate(world) {
                Ok(rate) => Some(i64::from(rate)),
                Err(e) => {
                    warn!(network = %self.id, element = %key, error = %e, "consumption lookup failed");
                    None
                }
            })
            .sum()
    }

    pub fn add_channel_mapping(&mut self, name: &str) -> ChannelId {
        let id = self.part_network.channels_mut().add(name);
        debug!(network = %self.id, channel = name, id = id.0, "channel mapped");
        id
    }

    /// Remove a channel and clear it from every member that used it
    pub fn remove_channel_mapping(
        &mut self,
        name: &str,
        world: &mut dyn PartWorld,
    ) -> PartnetResult<ChannelId> {
        let id = self.part_network.channels_mut().remove(name)?;
        for (key, member) in &self.members {
            if let Err(e) = member.element.on_channel_removed(world, id) {
                warn!(network = %self.id, element = %key, error = %e, "channel cleanup failed");
            }
        }
        debug!(network = %self.id, channel = name, id = id.0, "channel unmapped");
        Ok(id)
    }

    pub fn rename_channel_mapping(&mut self, old: &str, new: &str) -> PartnetResult<ChannelId> {
        self.part_network.channels_mut().rename(old, new)
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("members", &self.members.len())
            .field("tick", &self.tick)
            .finish()
    }
}
