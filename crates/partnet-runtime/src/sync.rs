//! Value sync - last-value channel towards the presentation side
//!
//! Values are keyed by `ValueId`. A push overwrites any value still pending
//! for the same id; there is no ordering across ids.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use partnet_core::{ChannelId, ValueId};

/// A value carried by the sync channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncValue {
    Int(i32),
    Text(String),
    /// Snapshot of a network's channel table
    Channels(BTreeMap<String, ChannelId>),
}

impl SyncValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SyncValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SyncValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Shared handle; clones see the same pending values
#[derive(Clone, Debug, Default)]
pub struct ValueSync {
    pending: Arc<Mutex<BTreeMap<ValueId, SyncValue>>>,
    next_id: Arc<Mutex<u32>>,
}

impl ValueSync {
    pub fn new() -> Self {
        ValueSync::default()
    }

    /// Reserve a fresh value id. Ids wrap around after `u32::MAX`.
    pub fn allocate(&self) -> ValueId {
        let mut next = self.next_id.lock();
        let id = ValueId::new(*next);
        *next = next.wrapping_add(1);
        id
    }

    pub fn push(&self, id: ValueId, value: SyncValue) {
        self.pending.lock().insert(id, value);
    }

    /// Take every pending value
    pub fn drain(&self) -> BTreeMap<ValueId, SyncValue> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}
