//! Part types - shared, stateless behavior of one kind of part
//!
//! A part type is registered once and handed around as `Arc<dyn PartType>`.
//! All per-instance data lives in the [`PartState`] passed to each call.

use std::sync::Arc;

use partnet_core::{
    BlockPos, LocalizedMessage, PartId, PartPos, PartTarget, PartTypeId, PartnetError,
    PartnetResult, Value,
};

use crate::{Aspect, AspectKind, AspectVariable, PartNetworkView, PartState, PartStateRecord};

/// Something a part leaves behind when it is removed from the world
#[derive(Clone, Debug, PartialEq)]
pub enum PartDrop {
    /// The part itself, carrying its persisted state
    Part {
        part_type: String,
        record: PartStateRecord,
    },
    /// Any extra item a part type chooses to drop
    Extra(String),
}

/// Behavior descriptor of one kind of part
pub trait PartType: Send + Sync {
    fn unlocalized_name(&self) -> &str;

    /// Aspects exposed by every part of this kind
    fn aspects(&self) -> &[Arc<dyn Aspect>] {
        &[]
    }

    fn aspect(&self, unlocalized_name: &str) -> Option<&Arc<dyn Aspect>> {
        self.aspects()
            .iter()
            .find(|a| a.unlocalized_name() == unlocalized_name)
    }

    /// Lowest update interval the given state may be configured with
    fn minimum_update_interval(&self, _state: &PartState) -> u32 {
        1
    }

    fn update_interval(&self, state: &PartState) -> u32 {
        state.update_interval()
    }

    /// Whether this part wants per-tick updates at all
    fn is_update(&self, _state: &PartState) -> bool {
        true
    }

    fn priority(&self, state: &PartState) -> i32 {
        state.priority()
    }

    /// Energy consumed per update
    fn consumption_rate(&self, _state: &PartState) -> i32 {
        1
    }

    /// Addressing of a part of this kind mounted at `center`
    fn target(&self, center: PartPos, state: &PartState) -> PartTarget {
        PartTarget::for_part(center, state.side_override())
    }

    /// Fresh state for a newly placed part
    fn create_state(&self, id: PartId, type_id: PartTypeId) -> PartState {
        let mut state = PartState::new(id, type_id, 1);
        let minimum = self.minimum_update_interval(&state);
        state.clamp_update_interval(minimum);
        state.take_dirty();
        state
    }

    fn update(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn post_update(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
        _updated: bool,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_network_addition(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_network_removal(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn before_network_kill(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn after_network_alive(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn after_network_re_alive(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_pre_removed(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_post_removed(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn on_block_neighbor_change(
        &self,
        _network: &mut dyn PartNetworkView,
        _target: &PartTarget,
        _state: &mut PartState,
        _neighbor: BlockPos,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn add_drops(
        &self,
        _target: &PartTarget,
        state: &PartState,
        drops: &mut Vec<PartDrop>,
        drop_main_element: bool,
    ) {
        if drop_main_element {
            drops.push(PartDrop::Part {
                part_type: self.unlocalized_name().to_string(),
                record: state.to_record(),
            });
        }
    }

    /// Current value of one of this part's aspects.
    ///
    /// Returns the value last published by the aspect, or the default value
    /// of its type when nothing was published yet.
    fn variable(
        &self,
        _target: &PartTarget,
        state: &PartState,
        aspect: &dyn Aspect,
    ) -> PartnetResult<AspectVariable> {
        let name = aspect.unlocalized_name();
        if self.aspect(&name).is_none() {
            return Err(PartnetError::UnknownAspect {
                part_type: self.unlocalized_name().to_string(),
                aspect: name,
            });
        }
        let value = state
            .variable(&name)
            .cloned()
            .unwrap_or_else(|| aspect.value_type().default_value());
        Ok(AspectVariable {
            value_type: aspect.value_type(),
            value,
        })
    }
}

/// Run a part's update followed by the update hook of each of its aspects.
///
/// On failure the state is rolled back to what it was before the update.
pub fn update_part(
    part_type: &dyn PartType,
    network: &mut dyn PartNetworkView,
    target: &PartTarget,
    state: &mut PartState,
) -> PartnetResult<()> {
    let committed = state.clone();
    let result = run_update(part_type, network, target, state);
    if result.is_err() {
        *state = committed;
    }
    result
}

fn run_update(
    part_type: &dyn PartType,
    network: &mut dyn PartNetworkView,
    target: &PartTarget,
    state: &mut PartState,
) -> PartnetResult<()> {
    part_type.update(network, target, state)?;
    for aspect in part_type.aspects() {
        aspect.update(network, part_type, target, state)?;
    }
    Ok(())
}

/// Store `variable` as the input of a write aspect.
///
/// A variable whose value type differs from the aspect's is rejected with a
/// localized error and nothing is stored.
pub fn set_aspect_input(
    part_type: &dyn PartType,
    state: &mut PartState,
    aspect_name: &str,
    variable: Option<Value>,
) -> PartnetResult<()> {
    let aspect = part_type
        .aspect(aspect_name)
        .ok_or_else(|| PartnetError::UnknownAspect {
            part_type: part_type.unlocalized_name().to_string(),
            aspect: aspect_name.to_string(),
        })?;
    if aspect.kind() != AspectKind::Write {
        return Err(PartnetError::Validation(
            LocalizedMessage::new("partnet.aspect.error.not_writable").with_arg(aspect_name),
        ));
    }
    match variable {
        Some(value) if value.value_type() != aspect.value_type() => {
            Err(PartnetError::Validation(
                LocalizedMessage::new("partnet.aspect.error.input_type")
                    .with_arg(aspect_name)
                    .with_arg(aspect.value_type())
                    .with_arg(value.value_type()),
            ))
        }
        Some(value) => {
            state.set_input(aspect_name, value);
            Ok(())
        }
        None => {
            state.clear_input(aspect_name);
            Ok(())
        }
    }
}
