//! Recorder part types

use std::sync::Arc;

use partnet_core::{BlockPos, PartTarget, PartnetError, PartnetResult, Value, ValueType};
use partnet_part::{
    Aspect, AspectCapability, AspectProperties, AspectPropertyTypeInstance, PartNetworkView,
    PartState, PartType, ReadAspect, WriteAspect,
};

use crate::{Hook, HookJournal};

/// Part type that journals every callback
pub struct RecorderPart {
    name: String,
    journal: HookJournal,
    minimum_update_interval: u32,
    side_minimum_update_interval: Option<u32>,
    consumption_rate: i32,
    fail_removal: bool,
    aspects: Vec<Arc<dyn Aspect>>,
}

impl RecorderPart {
    pub fn new(name: impl Into<String>, journal: HookJournal) -> Self {
        RecorderPart {
            name: name.into(),
            journal,
            minimum_update_interval: 1,
            side_minimum_update_interval: None,
            consumption_rate: 1,
            fail_removal: false,
            aspects: default_aspects(),
        }
    }

    pub fn with_minimum_update_interval(mut self, minimum: u32) -> Self {
        self.minimum_update_interval = minimum;
        self
    }

    /// Use `minimum` instead while a side override is set
    pub fn with_side_minimum_update_interval(mut self, minimum: u32) -> Self {
        self.side_minimum_update_interval = Some(minimum);
        self
    }

    pub fn with_consumption_rate(mut self, rate: i32) -> Self {
        self.consumption_rate = rate;
        self
    }

    /// Make `on_network_removal` fail after being journaled
    pub fn failing_removal(mut self) -> Self {
        self.fail_removal = true;
        self
    }

    fn record(&self, state: &PartState, hook: Hook) {
        self.journal.record(state.id(), hook);
    }
}

fn default_aspects() -> Vec<Arc<dyn Aspect>> {
    let offset = AspectPropertyTypeInstance::new("offset", ValueType::Integer);
    let defaults = AspectProperties::new().with("offset", Value::Integer(0));
    vec![
        Arc::new(
            ReadAspect::new("priority", ValueType::Integer, |_, state, props| {
                Ok(Value::Integer(state.priority() + props.get_int("offset").unwrap_or(0)))
            })
            .with_capability(AspectCapability::configurable(vec![offset], defaults)),
        ),
        Arc::new(ReadAspect::new("interval", ValueType::Integer, |_, state, _| {
            Ok(Value::Integer(i32::try_from(state.update_interval()).unwrap_or(i32::MAX)))
        })),
        Arc::new(WriteAspect::new("signal", ValueType::Boolean, |_, _, _, _| Ok(()))),
    ]
}

impl PartType for RecorderPart {
    fn unlocalized_name(&self) -> &str {
        &self.name
    }

    fn aspects(&self) -> &[Arc<dyn Aspect>] {
        &self.aspects
    }

    fn minimum_update_interval(&self, state: &PartState) -> u32 {
        match (state.side_override(), self.side_minimum_update_interval) {
            (Some(_), Some(minimum)) => minimum,
            _ => self.minimum_update_interval,
        }
    }

    fn consumption_rate(&self, _state: &PartState) -> i32 {
        self.consumption_rate
    }

    fn update(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::Update);
        Ok(())
    }

    fn post_update(
        &self,
        _: &mut dyn PartNetworkView,
        _: &PartTarget,
        state: &mut PartState,
        updated: bool,
    ) -> PartnetResult<()> {
        self.record(state, Hook::PostUpdate { updated });
        Ok(())
    }

    fn on_network_addition(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::NetworkAddition);
        Ok(())
    }

    fn on_network_removal(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::NetworkRemoval);
        if self.fail_removal {
            return Err(PartnetError::Hook(format!("{} refused removal", self.name)));
        }
        Ok(())
    }

    fn before_network_kill(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::BeforeKill);
        Ok(())
    }

    fn after_network_alive(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::Alive);
        Ok(())
    }

    fn after_network_re_alive(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::ReAlive);
        Ok(())
    }

    fn on_pre_removed(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::PreRemoved);
        Ok(())
    }

    fn on_post_removed(&self, _: &mut dyn PartNetworkView, _: &PartTarget, state: &mut PartState) -> PartnetResult<()> {
        self.record(state, Hook::PostRemoved);
        Ok(())
    }

    fn on_block_neighbor_change(
        &self,
        _: &mut dyn PartNetworkView,
        _: &PartTarget,
        state: &mut PartState,
        _: BlockPos,
    ) -> PartnetResult<()> {
        self.record(state, Hook::NeighborChange);
        Ok(())
    }
}
