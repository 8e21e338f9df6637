//! Part state - durable per-instance data
//!
//! A part state outlives every network the part joins. It carries the
//! user-facing settings, per-aspect property records and the latest values
//! published by the part's aspects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use partnet_core::{
    ChannelId, Facing, LocalizedMessage, PartId, PartTypeId, PartnetError, PartnetResult, Value,
};

use crate::AspectProperties;

/// Mutable data of one part instance
#[derive(Clone, Debug, PartialEq)]
pub struct PartState {
    id: PartId,
    part_type: PartTypeId,
    update_interval: u32,
    priority: i32,
    channel: Option<ChannelId>,
    side_override: Option<Facing>,
    /// Property records keyed by aspect unlocalized name
    aspect_properties: BTreeMap<String, AspectProperties>,
    /// Latest value published by each read aspect
    variables: BTreeMap<String, Value>,
    /// Pending input for each write aspect
    inputs: BTreeMap<String, Value>,
    dirty: bool,
}

impl PartState {
    pub fn new(id: PartId, part_type: PartTypeId, update_interval: u32) -> Self {
        PartState {
            id,
            part_type,
            update_interval: update_interval.max(1),
            priority: 0,
            channel: None,
            side_override: None,
            aspect_properties: BTreeMap::new(),
            variables: BTreeMap::new(),
            inputs: BTreeMap::new(),
            dirty: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PartId {
        self.id
    }

    #[inline]
    pub fn part_type(&self) -> PartTypeId {
        self.part_type
    }

    #[inline]
    pub fn update_interval(&self) -> u32 {
        self.update_interval
    }

    /// Commit a new update interval.
    ///
    /// Values below `minimum` are rejected and the current interval is kept.
    pub fn set_update_interval(&mut self, requested: i32, minimum: u32) -> PartnetResult<()> {
        match u32::try_from(requested) {
            Ok(interval) if interval >= minimum.max(1) => {
                self.update_interval = interval;
                self.dirty = true;
                Ok(())
            }
            _ => Err(PartnetError::Validation(
                LocalizedMessage::new("partnet.settings.error.interval_below_minimum")
                    .with_arg(requested)
                    .with_arg(minimum),
            )),
        }
    }

    /// Raise the interval to `minimum` if the part type now demands more
    pub fn clamp_update_interval(&mut self, minimum: u32) -> bool {
        if self.update_interval < minimum {
            self.update_interval = minimum;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
        self.dirty = true;
    }

    #[inline]
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn set_channel(&mut self, channel: Option<ChannelId>) {
        self.channel = channel;
        self.dirty = true;
    }

    #[inline]
    pub fn side_override(&self) -> Option<Facing> {
        self.side_override
    }

    pub fn set_side_override(&mut self, side: Option<Facing>) {
        self.side_override = side;
        self.dirty = true;
    }

    pub fn aspect_properties(&self, aspect: &str) -> Option<&AspectProperties> {
        self.aspect_properties.get(aspect)
    }

    pub fn set_aspect_properties(&mut self, aspect: &str, properties: AspectProperties) {
        self.aspect_properties.insert(aspect.to_string(), properties);
        self.dirty = true;
    }

    pub fn variable(&self, aspect: &str) -> Option<&Value> {
        self.variables.get(aspect)
    }

    /// Publish the latest value of a read aspect
    pub fn publish_variable(&mut self, aspect: &str, value: Value) {
        self.variables.insert(aspect.to_string(), value);
    }

    pub fn input(&self, aspect: &str) -> Option<&Value> {
        self.inputs.get(aspect)
    }

    pub fn set_input(&mut self, aspect: &str, value: Value) {
        self.inputs.insert(aspect.to_string(), value);
        self.dirty = true;
    }

    pub fn clear_input(&mut self, aspect: &str) -> Option<Value> {
        let removed = self.inputs.remove(aspect);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Whether persisted fields changed since the last `take_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Snapshot of the fields that survive a save/reload
    pub fn to_record(&self) -> PartStateRecord {
        PartStateRecord {
            id: self.id.0,
            update_interval: i32::try_from(self.update_interval).unwrap_or(i32::MAX),
            priority: self.priority,
            channel: ChannelId::to_persisted(self.channel),
            side: Facing::to_persisted(self.side_override),
            aspect_properties: self.aspect_properties.clone(),
            inputs: self.inputs.clone(),
        }
    }

    /// Rebuild a state from its persisted record.
    ///
    /// An interval below `minimum` is raised to it; an unknown side ordinal
    /// is rejected.
    pub fn from_record(
        record: &PartStateRecord,
        part_type: PartTypeId,
        minimum: u32,
    ) -> PartnetResult<Self> {
        let side_override = if record.side < 0 {
            None
        } else {
            Some(Facing::from_ordinal(record.side).ok_or_else(|| {
                PartnetError::InvalidRecord(format!("side ordinal {}", record.side))
            })?)
        };
        let interval = u32::try_from(record.update_interval).unwrap_or(0);

        Ok(PartState {
            id: PartId(record.id),
            part_type,
            update_interval: interval.max(minimum).max(1),
            priority: record.priority,
            channel: ChannelId::from_persisted(record.channel),
            side_override,
            aspect_properties: record.aspect_properties.clone(),
            variables: BTreeMap::new(),
            inputs: record.inputs.clone(),
            dirty: false,
        })
    }
}

/// Persisted part state fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartStateRecord {
    pub id: u64,
    pub update_interval: i32,
    pub priority: i32,
    /// Channel id, -1 = none
    pub channel: i32,
    /// Side override ordinal, -1 = default side
    pub side: i32,
    #[serde(default)]
    pub aspect_properties: BTreeMap<String, AspectProperties>,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
}

impl PartStateRecord {
    pub fn to_json(&self) -> PartnetResult<String> {
        serde_json::to_string(self).map_err(|e| PartnetError::InvalidRecord(e.to_string()))
    }

    pub fn from_json(json: &str) -> PartnetResult<Self> {
        serde_json::from_str(json).map_err(|e| PartnetError::InvalidRecord(e.to_string()))
    }
}
