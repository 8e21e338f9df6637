//! Simulation - the single-threaded driver
//!
//! Owns the world, the part type registry and every network. Each tick:
//! 1. Apply pending settings intents
//! 2. Tick every network
//! 3. Record energy consumption
//! 4. Push changed settings of open sessions

use std::collections::BTreeMap;

use partnet_core::{
    BlockPos, ChannelId, LocalizedMessage, NetworkId, PartId, PartPos, PartTarget, PartnetError,
    PartnetResult, Value,
};
use partnet_network::{
    discover_cluster, Addition, ElementKey, Network, PartNetworkElement, TickReport,
};
use partnet_part::{
    resolve_state, resolve_state_mut, set_aspect_input, PartDrop, PartState, PartStateRecord,
    PartTypeRegistry,
};
use tracing::{debug, info, warn};

use crate::{
    intent_channel, AspectListing, InMemoryWorld, IntentReceiver, IntentSender, RuntimeConfig,
    RuntimeResult, SettingChange, SettingsForm, SettingsIntent, SettingsSession, ValueSync,
};

/// An intent that failed validation; nothing of it was committed
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedIntent {
    pub intent: SettingsIntent,
    pub error: PartnetError,
}

/// Outcome of one simulation tick
#[derive(Clone, Debug, Default)]
pub struct SimulationTick {
    pub tick: u64,
    pub reports: BTreeMap<NetworkId, TickReport>,
    /// Consumption of this tick, scaled by the configured multiplier
    pub energy: f64,
    pub rejected: Vec<RejectedIntent>,
}

pub struct Simulation {
    config: RuntimeConfig,
    world: InMemoryWorld,
    registry: PartTypeRegistry,
    networks: BTreeMap<NetworkId, Network>,
    membership: BTreeMap<PartPos, NetworkId>,
    sessions: BTreeMap<PartPos, SettingsSession>,
    sync: ValueSync,
    intent_tx: IntentSender,
    intents: IntentReceiver,
    next_part_id: PartId,
    next_network_id: u64,
    tick: u64,
    energy_consumed: f64,
}

impl Simulation {
    pub fn new(config: RuntimeConfig, registry: PartTypeRegistry) -> Self {
        let (intent_tx, intents) = intent_channel(config.intent_queue_capacity);
        Simulation {
            config,
            world: InMemoryWorld::new(),
            registry,
            networks: BTreeMap::new(),
            membership: BTreeMap::new(),
            sessions: BTreeMap::new(),
            sync: ValueSync::new(),
            intent_tx,
            intents,
            next_part_id: PartId::new(1),
            next_network_id: 1,
            tick: 0,
            energy_consumed: 0.0,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn world(&self) -> &InMemoryWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut InMemoryWorld {
        &mut self.world
    }

    pub fn registry(&self) -> &PartTypeRegistry {
        &self.registry
    }

    /// Presentation side of the value sync channel
    pub fn sync(&self) -> &ValueSync {
        &self.sync
    }

    /// Presentation side of the intent queue
    pub fn intent_sender(&self) -> IntentSender {
        self.intent_tx.clone()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Total scaled energy consumed so far
    pub fn energy_consumed(&self) -> f64 {
        self.energy_consumed
    }

    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.networks.get(&id)
    }

    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    pub fn network_of(&self, center: PartPos) -> Option<NetworkId> {
        self.membership.get(&center).copied()
    }

    pub fn part_state(&self, center: PartPos) -> RuntimeResult<&PartState> {
        Ok(resolve_state(&self.world, center)?)
    }

    /// Place a fresh part of the named type
    pub fn place_part(&mut self, center: PartPos, part_type: &str) -> RuntimeResult<PartId> {
        let type_id = self.registry.id_of(part_type)?;
        let part = self.registry.get(type_id)?;
        let id = self.next_part_id;
        self.world.insert_part(center, part.create_state(id, type_id))?;
        self.next_part_id = id.next();
        info!(part = %id, part_type, pos = %center, "part placed");
        Ok(id)
    }

    /// Place a part from a persisted record, e.g. a dropped part
    pub fn restore_part(
        &mut self,
        center: PartPos,
        part_type: &str,
        record: &PartStateRecord,
    ) -> RuntimeResult<PartId> {
        let type_id = self.registry.id_of(part_type)?;
        let part = self.registry.get(type_id)?;
        let mut state = PartState::from_record(record, type_id, 1)?;
        let minimum = part.minimum_update_interval(&state);
        if state.clamp_update_interval(minimum) {
            debug!(part = %state.id(), minimum, "raised restored update interval");
        }
        let id = state.id();
        self.world.insert_part(center, state)?;
        if id >= self.next_part_id {
            self.next_part_id = id.next();
        }
        info!(part = %id, part_type, pos = %center, "part restored");
        Ok(id)
    }

    /// Form a network from every free part connected to `start` and bring it alive
    pub fn form_network(&mut self, start: BlockPos) -> RuntimeResult<NetworkId> {
        let id = NetworkId::new(self.next_network_id);
        self.next_network_id += 1;
        let mut network = Network::new(id);

        for target in discover_cluster(start, &self.world) {
            let center = target.center();
            if let Some(owner) = self.membership.get(&center) {
                debug!(pos = %center, network = %owner, "part already in a network");
                continue;
            }
            let added = PartNetworkElement::from_world(&self.registry, &self.world, center)
                .and_then(|element| network.add_element(Box::new(element), &mut self.world));
            match added {
                Ok(Addition::Added) => {
                    self.membership.insert(center, id);
                }
                Ok(Addition::Rejected) => warn!(network = %id, pos = %center, "part rejected"),
                Err(e) => warn!(network = %id, pos = %center, error = %e, "part could not join"),
            }
        }

        network.revive(&mut self.world)?;
        info!(network = %id, members = network.len(), "network formed");
        self.networks.insert(id, network);
        Ok(id)
    }

    /// Take a part out of the world, returning what it drops
    pub fn remove_part(&mut self, center: PartPos) -> RuntimeResult<Vec<PartDrop>> {
        let type_id = resolve_state(&self.world, center)?.part_type();
        let mut drops = Vec::new();

        match self.membership.get(&center).copied() {
            Some(network_id) => {
                let network = self
                    .networks
                    .get_mut(&network_id)
                    .ok_or(PartnetError::NetworkNotFound(network_id))?;
                let key = ElementKey::part(type_id, center);
                drops = network.drops_of(&key, &self.world, true)?;
                network.remove_element(&key, &mut self.world)?;
                self.membership.remove(&center);
            }
            None => {
                let part = self.registry.get(type_id)?;
                let state = resolve_state(&self.world, center)?;
                part.add_drops(&part.target(center, state), state, &mut drops, true);
            }
        }

        self.world.remove_part(center);
        self.sessions.remove(&center);
        info!(pos = %center, drops = drops.len(), "part removed");
        Ok(drops)
    }

    pub fn kill_network(&mut self, id: NetworkId) -> RuntimeResult<()> {
        let network = self
            .networks
            .get_mut(&id)
            .ok_or(PartnetError::NetworkNotFound(id))?;
        Ok(network.kill(&mut self.world)?)
    }

    pub fn revive_network(&mut self, id: NetworkId) -> RuntimeResult<()> {
        let network = self
            .networks
            .get_mut(&id)
            .ok_or(PartnetError::NetworkNotFound(id))?;
        Ok(network.revive(&mut self.world)?)
    }

    fn network_mut(&mut self, id: NetworkId) -> PartnetResult<&mut Network> {
        self.networks
            .get_mut(&id)
            .ok_or(PartnetError::NetworkNotFound(id))
    }

    pub fn add_channel(&mut self, network: NetworkId, name: &str) -> RuntimeResult<ChannelId> {
        let channel = self.network_mut(network)?.add_channel_mapping(name);
        self.push_channel_tables(network);
        Ok(channel)
    }

    pub fn remove_channel(&mut self, network: NetworkId, name: &str) -> RuntimeResult<ChannelId> {
        let net = self
            .networks
            .get_mut(&network)
            .ok_or(PartnetError::NetworkNotFound(network))?;
        let channel = net.remove_channel_mapping(name, &mut self.world)?;
        self.push_channel_tables(network);
        Ok(channel)
    }

    pub fn rename_channel(&mut self, network: NetworkId, old: &str, new: &str) -> RuntimeResult<ChannelId> {
        let channel = self.network_mut(network)?.rename_channel_mapping(old, new)?;
        self.push_channel_tables(network);
        Ok(channel)
    }

    /// Forward a neighbor block change to the parts mounted at `pos`
    pub fn neighbor_changed(&mut self, pos: BlockPos, neighbor: BlockPos) {
        for network in self.networks.values_mut() {
            network.on_neighbor_block_change(pos, neighbor, &mut self.world);
        }
    }

    /// Open the settings of a part; the session pushes the current values
    pub fn open_settings(&mut self, center: PartPos) -> RuntimeResult<SettingsForm> {
        let state = resolve_state(&self.world, center)?;
        let part = self.registry.get(state.part_type())?;
        let minimum = part.minimum_update_interval(state);

        let session = SettingsSession::open(&self.sync, center);
        session.push_state(state);
        if let Some(network) = self.network_of(center).and_then(|id| self.networks.get(&id)) {
            session.push_channels(network.channels());
        }

        let form = SettingsForm::new(center, session.ids(), minimum, self.config.channels_enabled());
        self.sessions.insert(center, session);
        debug!(pos = %center, "settings opened");
        Ok(form)
    }

    pub fn close_settings(&mut self, center: PartPos) -> bool {
        self.sessions.remove(&center).is_some()
    }

    /// Aspect overview of a part
    pub fn listing(&self, center: PartPos) -> RuntimeResult<AspectListing> {
        let state = resolve_state(&self.world, center)?;
        let part = self.registry.get(state.part_type())?;
        AspectListing::build(part.as_ref(), &part.target(center, state), state)
    }

    /// Set or clear the input variable of a write aspect
    pub fn set_aspect_input(
        &mut self,
        center: PartPos,
        aspect: &str,
        variable: Option<Value>,
    ) -> RuntimeResult<()> {
        let type_id = resolve_state(&self.world, center)?.part_type();
        let part = self.registry.get(type_id)?;
        let state = resolve_state_mut(&mut self.world, center)?;
        Ok(set_aspect_input(part.as_ref(), state, aspect, variable)?)
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> SimulationTick {
        self.tick += 1;

        let mut rejected = Vec::new();
        for intent in self.intents.drain() {
            if let Err(error) = self.apply_intent(&intent) {
                warn!(pos = %intent.target, change = ?intent.change, error = %error, "settings intent rejected");
                self.resync(intent.target);
                rejected.push(RejectedIntent { intent, error });
            }
        }

        let mut reports = BTreeMap::new();
        let mut consumption = 0i64;
        for (id, network) in self.networks.iter_mut() {
            let report = network.tick(&mut self.world);
            consumption += report.consumption;
            reports.insert(*id, report);
        }
        let energy = consumption as f64 * self.config.energy_consumption_multiplier;
        self.energy_consumed += energy;

        self.sync_sessions();

        SimulationTick {
            tick: self.tick,
            reports,
            energy,
            rejected,
        }
    }

    fn apply_intent(&mut self, intent: &SettingsIntent) -> PartnetResult<()> {
        self.commit_change(intent)?;
        self.enforce_minimum_interval(intent.target)
    }

    /// Raise the update interval to the minimum implied by the current state
    fn enforce_minimum_interval(&mut self, center: PartPos) -> PartnetResult<()> {
        let state = resolve_state(&self.world, center)?;
        let minimum = self.registry.get(state.part_type())?.minimum_update_interval(state);
        if resolve_state_mut(&mut self.world, center)?.clamp_update_interval(minimum) {
            debug!(part = %center, minimum, "update interval raised to new minimum");
        }
        Ok(())
    }

    fn commit_change(&mut self, intent: &SettingsIntent) -> PartnetResult<()> {
        let center = intent.target;
        match &intent.change {
            SettingChange::Side(side) => {
                let side = side.filter(|s| *s != PartTarget::default_side(center));
                resolve_state_mut(&mut self.world, center)?.set_side_override(side);
                self.refresh_element(center)
            }
            SettingChange::UpdateInterval(requested) => {
                let state = resolve_state(&self.world, center)?;
                let minimum = self.registry.get(state.part_type())?.minimum_update_interval(state);
                resolve_state_mut(&mut self.world, center)?.set_update_interval(*requested, minimum)
            }
            SettingChange::Priority(priority) => {
                resolve_state_mut(&mut self.world, center)?.set_priority(*priority);
                Ok(())
            }
            SettingChange::Channel(None) => {
                resolve_state_mut(&mut self.world, center)?.set_channel(None);
                Ok(())
            }
            SettingChange::Channel(Some(name)) => {
                self.check_channels_enabled()?;
                let network = self.network_for(center)?;
                let channel = network
                    .channels()
                    .id(name)
                    .ok_or_else(|| PartnetError::ChannelNotFound(name.clone()))?;
                resolve_state_mut(&mut self.world, center)?.set_channel(Some(channel));
                Ok(())
            }
            SettingChange::CreateChannel(name) => {
                self.check_channels_enabled()?;
                let id = self.network_for(center)?.id();
                let channel = self.network_mut(id)?.add_channel_mapping(name);
                debug!(network = %id, channel = name.as_str(), id = channel.0, "channel created from settings");
                self.push_channel_tables(id);
                Ok(())
            }
        }
    }

    fn check_channels_enabled(&self) -> PartnetResult<()> {
        if self.config.channels_enabled() {
            Ok(())
        } else {
            Err(PartnetError::Validation(LocalizedMessage::new(
                "partnet.settings.error.channels_disabled",
            )))
        }
    }

    fn network_for(&self, center: PartPos) -> PartnetResult<&Network> {
        let id = self
            .network_of(center)
            .ok_or(PartnetError::NotInNetwork(center))?;
        self.networks.get(&id).ok_or(PartnetError::NetworkNotFound(id))
    }

    /// Rebuild the network element of a part whose target changed
    fn refresh_element(&mut self, center: PartPos) -> PartnetResult<()> {
        let Some(id) = self.network_of(center) else {
            return Ok(());
        };
        let element = PartNetworkElement::from_world(&self.registry, &self.world, center)?;
        self.network_mut(id)?.replace_element(Box::new(element))
    }

    fn resync(&mut self, center: PartPos) {
        if let (Some(session), Ok(state)) = (self.sessions.get(&center), resolve_state(&self.world, center)) {
            session.push_state(state);
        }
    }

    fn push_channel_tables(&self, network: NetworkId) {
        let Some(net) = self.networks.get(&network) else {
            return;
        };
        for (center, session) in &self.sessions {
            if self.membership.get(center) == Some(&network) {
                session.push_channels(net.channels());
            }
        }
    }

    fn sync_sessions(&mut self) {
        for (center, session) in &self.sessions {
            if let Ok(state) = resolve_state_mut(&mut self.world, *center) {
                if state.take_dirty() {
                    session.push_state(state);
                }
            }
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("networks", &self.networks.len())
            .field("parts", &self.membership.len())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
