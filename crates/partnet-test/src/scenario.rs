//! Scenario builder for part network tests
//!
//! Parts are placed on a line along the x axis, facing up, and named by a
//! label so tests can address them without tracking positions.

use std::collections::BTreeMap;
use std::sync::Arc;

use partnet_core::{BlockPos, Facing, NetworkId, PartId, PartPos};
use partnet_part::{resolve_state_mut, PartState, PartType, PartTypeRegistry};
use partnet_runtime::{RuntimeConfig, RuntimeError, Simulation, SimulationTick};
use thiserror::Error;

use crate::{HookJournal, RecorderPart};

/// Name of the recorder type registered by default
pub const RECORDER: &str = "parttype.partnet.recorder";

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Unknown part label: {0}")]
    UnknownLabel(String),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

struct PlannedPart {
    label: String,
    part_type: String,
    x: i32,
    priority: i32,
}

/// Builds a [`Scenario`]
pub struct ScenarioBuilder {
    config: RuntimeConfig,
    journal: HookJournal,
    types: Vec<RecorderPart>,
    parts: Vec<PlannedPart>,
    cables: Vec<i32>,
    form: bool,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        ScenarioBuilder {
            config: RuntimeConfig::default(),
            journal: HookJournal::new(),
            types: Vec::new(),
            parts: Vec::new(),
            cables: Vec::new(),
            form: true,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a recorder type; `configure` tunes it
    pub fn part_type(mut self, name: &str, configure: impl FnOnce(RecorderPart) -> RecorderPart) -> Self {
        self.types.push(configure(RecorderPart::new(name, self.journal.clone())));
        self
    }

    /// Place a part of `part_type` at `x` with a starting priority
    pub fn part(mut self, label: &str, part_type: &str, x: i32, priority: i32) -> Self {
        self.parts.push(PlannedPart {
            label: label.to_string(),
            part_type: part_type.to_string(),
            x,
            priority,
        });
        self
    }

    pub fn cable(mut self, x: i32) -> Self {
        self.cables.push(x);
        self
    }

    /// Leave the parts without a network
    pub fn unformed(mut self) -> Self {
        self.form = false;
        self
    }

    pub fn build(self) -> ScenarioResult<Scenario> {
        let mut registry = PartTypeRegistry::new();
        if !self.types.iter().any(|t| t.unlocalized_name() == RECORDER) {
            registry
                .register(Arc::new(RecorderPart::new(RECORDER, self.journal.clone())))
                .map_err(RuntimeError::from)?;
        }
        for part_type in self.types {
            registry.register(Arc::new(part_type)).map_err(RuntimeError::from)?;
        }

        let mut sim = Simulation::new(self.config, registry);
        for x in self.cables {
            sim.world_mut().add_cable(BlockPos::new(x, 0, 0));
        }

        let mut parts = BTreeMap::new();
        for planned in self.parts {
            let center = Scenario::center_at(planned.x);
            let id = sim.place_part(center, &planned.part_type)?;
            let state = resolve_state_mut(sim.world_mut(), center).map_err(RuntimeError::from)?;
            state.set_priority(planned.priority);
            state.take_dirty();
            parts.insert(planned.label, (center, id));
        }

        let mut network = None;
        if self.form {
            if let Some((center, _)) = parts.values().next() {
                network = Some(sim.form_network(center.pos)?);
            }
        }

        Ok(Scenario {
            sim,
            journal: self.journal,
            parts,
            network,
        })
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running scenario
pub struct Scenario {
    pub sim: Simulation,
    pub journal: HookJournal,
    parts: BTreeMap<String, (PartPos, PartId)>,
    network: Option<NetworkId>,
}

impl Scenario {
    pub fn center_at(x: i32) -> PartPos {
        PartPos::new(BlockPos::new(x, 0, 0), Facing::Up)
    }

    pub fn network(&self) -> Option<NetworkId> {
        self.network
    }

    pub fn center(&self, label: &str) -> ScenarioResult<PartPos> {
        self.parts
            .get(label)
            .map(|(center, _)| *center)
            .ok_or_else(|| ScenarioError::UnknownLabel(label.to_string()))
    }

    pub fn id(&self, label: &str) -> ScenarioResult<PartId> {
        self.parts
            .get(label)
            .map(|(_, id)| *id)
            .ok_or_else(|| ScenarioError::UnknownLabel(label.to_string()))
    }

    pub fn state(&self, label: &str) -> ScenarioResult<&PartState> {
        let center = self.center(label)?;
        Ok(self.sim.part_state(center)?)
    }

    pub fn tick(&mut self) -> SimulationTick {
        self.sim.tick()
    }

    pub fn run(&mut self, ticks: u32) -> Vec<SimulationTick> {
        (0..ticks).map(|_| self.sim.tick()).collect()
    }
}
