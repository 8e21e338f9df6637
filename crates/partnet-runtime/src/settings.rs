//! Part settings - session on the simulation side, form on the presentation side
//!
//! The session pushes the committed side, update interval, priority, channel
//! and channel table through [`ValueSync`]. The form mirrors those values into
//! editable fields and turns a save into [`SettingsIntent`]s.

use std::collections::BTreeMap;

use partnet_core::{ChannelId, Facing, PartPos, PartTarget, ValueId};
use partnet_network::ChannelMappings;
use partnet_part::PartState;
use tracing::debug;

use crate::{IntentSender, RuntimeResult, SettingChange, SettingsIntent, SyncValue, ValueSync};

/// Value ids of one settings session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingsValueIds {
    pub side: ValueId,
    pub update_interval: ValueId,
    pub priority: ValueId,
    pub channel: ValueId,
    pub channels: ValueId,
}

impl SettingsValueIds {
    fn allocate(sync: &ValueSync) -> Self {
        SettingsValueIds {
            side: sync.allocate(),
            update_interval: sync.allocate(),
            priority: sync.allocate(),
            channel: sync.allocate(),
            channels: sync.allocate(),
        }
    }
}

/// Simulation-side half of an open settings screen
#[derive(Clone, Debug)]
pub struct SettingsSession {
    center: PartPos,
    ids: SettingsValueIds,
    sync: ValueSync,
}

impl SettingsSession {
    pub fn open(sync: &ValueSync, center: PartPos) -> Self {
        SettingsSession {
            center,
            ids: SettingsValueIds::allocate(sync),
            sync: sync.clone(),
        }
    }

    pub fn center(&self) -> PartPos {
        self.center
    }

    pub fn ids(&self) -> SettingsValueIds {
        self.ids
    }

    /// Push the committed settings of `state`
    pub fn push_state(&self, state: &PartState) {
        self.sync
            .push(self.ids.side, SyncValue::Int(Facing::to_persisted(state.side_override())));
        self.sync.push(
            self.ids.update_interval,
            SyncValue::Int(i32::try_from(state.update_interval()).unwrap_or(i32::MAX)),
        );
        self.sync.push(self.ids.priority, SyncValue::Int(state.priority()));
        self.sync
            .push(self.ids.channel, SyncValue::Int(ChannelId::to_persisted(state.channel())));
    }

    /// Push the channel table of the part's network
    pub fn push_channels(&self, channels: &ChannelMappings) {
        self.sync
            .push(self.ids.channels, SyncValue::Channels(channels.snapshot()));
    }
}

/// Presentation-side settings form
#[derive(Clone, Debug)]
pub struct SettingsForm {
    center: PartPos,
    ids: SettingsValueIds,
    minimum_update_interval: u32,
    channels_enabled: bool,
    side: Option<Facing>,
    update_interval: String,
    priority: String,
    channel: Option<String>,
    channel_id: Option<ChannelId>,
    channels: BTreeMap<String, ChannelId>,
}

impl SettingsForm {
    pub fn new(
        center: PartPos,
        ids: SettingsValueIds,
        minimum_update_interval: u32,
        channels_enabled: bool,
    ) -> Self {
        SettingsForm {
            center,
            ids,
            minimum_update_interval,
            channels_enabled,
            side: None,
            update_interval: minimum_update_interval.to_string(),
            priority: "0".to_string(),
            channel: None,
            channel_id: None,
            channels: BTreeMap::new(),
        }
    }

    pub fn ids(&self) -> SettingsValueIds {
        self.ids
    }

    /// Side targeted when no override is set
    pub fn default_side(&self) -> Facing {
        PartTarget::default_side(self.center)
    }

    pub fn side(&self) -> Facing {
        self.side.unwrap_or_else(|| self.default_side())
    }

    pub fn update_interval_text(&self) -> &str {
        &self.update_interval
    }

    pub fn priority_text(&self) -> &str {
        &self.priority
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn channels(&self) -> &BTreeMap<String, ChannelId> {
        &self.channels
    }

    /// Channel selection is read-only when channels are disabled by policy
    pub fn is_channel_editable(&self) -> bool {
        self.channels_enabled
    }

    pub fn select_side(&mut self, side: Facing) {
        self.side = Some(side);
    }

    pub fn set_update_interval_text(&mut self, text: impl Into<String>) {
        self.update_interval = text.into();
    }

    pub fn set_priority_text(&mut self, text: impl Into<String>) {
        self.priority = text.into();
    }

    /// Select a channel by name; ignored when the channel field is read-only
    pub fn select_channel(&mut self, channel: Option<&str>) {
        if self.channels_enabled {
            self.channel = channel.map(str::to_string);
        }
    }

    /// Mirror one pushed value
    pub fn apply(&mut self, id: ValueId, value: &SyncValue) {
        match value {
            SyncValue::Int(v) if id == self.ids.side => {
                self.side = Facing::from_ordinal(*v);
            }
            SyncValue::Int(v) if id == self.ids.update_interval => {
                self.update_interval = v.to_string();
            }
            SyncValue::Int(v) if id == self.ids.priority => {
                self.priority = v.to_string();
            }
            SyncValue::Int(v) if id == self.ids.channel => {
                self.channel_id = ChannelId::from_persisted(*v);
                self.refresh_channel_name();
            }
            SyncValue::Channels(table) if id == self.ids.channels => {
                self.channels = table.clone();
                self.refresh_channel_name();
            }
            _ => {}
        }
    }

    pub fn apply_all(&mut self, values: &BTreeMap<ValueId, SyncValue>) {
        for (id, value) in values {
            self.apply(*id, value);
        }
    }

    fn refresh_channel_name(&mut self) {
        self.channel = self.channel_id.and_then(|id| {
            self.channels
                .iter()
                .find(|(_, c)| **c == id)
                .map(|(name, _)| name.clone())
        });
    }

    /// Intents for the current field values, in field order.
    ///
    /// A non-numeric interval or priority stops at that field: earlier
    /// intents are kept, the rest is dropped.
    pub fn save(&self) -> Vec<SettingsIntent> {
        let mut intents = Vec::with_capacity(4);

        let side = Some(self.side()).filter(|s| *s != self.default_side());
        intents.push(SettingsIntent::new(self.center, SettingChange::Side(side)));

        let Ok(interval) = self.update_interval.trim().parse::<i32>() else {
            debug!(field = "update_interval", "ignoring non-numeric input");
            return intents;
        };
        let minimum = i32::try_from(self.minimum_update_interval).unwrap_or(i32::MAX);
        intents.push(SettingsIntent::new(
            self.center,
            SettingChange::UpdateInterval(interval.max(minimum)),
        ));

        let Ok(priority) = self.priority.trim().parse::<i32>() else {
            debug!(field = "priority", "ignoring non-numeric input");
            return intents;
        };
        intents.push(SettingsIntent::new(self.center, SettingChange::Priority(priority)));

        if self.channels_enabled {
            intents.push(SettingsIntent::new(
                self.center,
                SettingChange::Channel(self.channel.clone()),
            ));
        }
        intents
    }

    /// Send the intents of [`save`](Self::save)
    pub fn submit(&self, sender: &IntentSender) -> RuntimeResult<usize> {
        let intents = self.save();
        let count = intents.len();
        for intent in intents {
            sender.send(intent)?;
        }
        Ok(count)
    }

    pub fn new_channel(&self, name: &str) -> SettingsIntent {
        SettingsIntent::new(self.center, SettingChange::CreateChannel(name.to_string()))
    }
}
