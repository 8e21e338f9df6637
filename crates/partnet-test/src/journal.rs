//! Hook journal - records part callbacks in call order

use std::sync::Arc;

use parking_lot::Mutex;
use partnet_core::PartId;

/// A part callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    Update,
    PostUpdate { updated: bool },
    NetworkAddition,
    NetworkRemoval,
    BeforeKill,
    Alive,
    ReAlive,
    PreRemoved,
    PostRemoved,
    NeighborChange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HookEvent {
    pub part: PartId,
    pub hook: Hook,
}

/// Shared, append-only record of hook calls
#[derive(Clone, Debug, Default)]
pub struct HookJournal {
    events: Arc<Mutex<Vec<HookEvent>>>,
}

impl HookJournal {
    pub fn new() -> Self {
        HookJournal::default()
    }

    pub fn record(&self, part: PartId, hook: Hook) {
        self.events.lock().push(HookEvent { part, hook });
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.events.lock().iter().filter(|e| e.hook == hook).count()
    }

    pub fn count_for(&self, part: PartId, hook: Hook) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.part == part && e.hook == hook)
            .count()
    }

    /// Parts in the order their `update` ran
    pub fn update_order(&self) -> Vec<PartId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.hook == Hook::Update)
            .map(|e| e.part)
            .collect()
    }
}
