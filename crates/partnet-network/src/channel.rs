//! Channel mappings - named routing groups of a network
//!
//! Names and ids form a bijection. New channels take the lowest free id;
//! renaming keeps the id.

use std::collections::BTreeMap;

use partnet_core::{ChannelId, PartnetError, PartnetResult};

/// Bidirectional channel name <-> id map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelMappings {
    by_name: BTreeMap<String, ChannelId>,
    by_id: BTreeMap<ChannelId, String>,
}

impl ChannelMappings {
    pub fn new() -> Self {
        ChannelMappings::default()
    }

    /// Add a channel, or return the id it already has
    pub fn add(&mut self, name: &str) -> ChannelId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = self.lowest_free_id();
        self.by_name.insert(name.to_string(), id);
        self.by_id.insert(id, name.to_string());
        id
    }

    /// Remove a channel by name, freeing its id
    pub fn remove(&mut self, name: &str) -> PartnetResult<ChannelId> {
        let id = self
            .by_name
            .remove(name)
            .ok_or_else(|| PartnetError::ChannelNotFound(name.to_string()))?;
        self.by_id.remove(&id);
        Ok(id)
    }

    /// Rename a channel, keeping its id
    pub fn rename(&mut self, old: &str, new: &str) -> PartnetResult<ChannelId> {
        if old == new {
            return self.id(old).ok_or_else(|| PartnetError::ChannelNotFound(old.to_string()));
        }
        if self.by_name.contains_key(new) {
            return Err(PartnetError::ChannelExists(new.to_string()));
        }
        let id = self
            .by_name
            .remove(old)
            .ok_or_else(|| PartnetError::ChannelNotFound(old.to_string()))?;
        self.by_name.insert(new.to_string(), id);
        self.by_id.insert(id, new.to_string());
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<ChannelId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: ChannelId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn contains_id(&self, id: ChannelId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Channels in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChannelId)> {
        self.by_name.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Point-in-time copy of the name -> id direction
    pub fn snapshot(&self) -> BTreeMap<String, ChannelId> {
        self.by_name.clone()
    }

    fn lowest_free_id(&self) -> ChannelId {
        let mut candidate = 0u32;
        for id in self.by_id.keys() {
            if id.0 != candidate {
                break;
            }
            candidate += 1;
        }
        ChannelId::new(candidate)
    }
}
