//! Aspects - typed capabilities exposed by parts
//!
//! An aspect is defined once and shared by every part that exposes it.
//! Read aspects publish a value into the part state each update; write
//! aspects consume the input variable stored in the part state.
//!
//! Configurability is declared up front through [`AspectCapability`] and
//! queried by value.

use std::cmp::Ordering;
use std::fmt;

use partnet_core::{
    LocalizedMessage, PartTarget, PartnetError, PartnetResult, Value, ValueType,
    ValueTypeComparator,
};

use crate::{AspectProperties, AspectPropertyTypeInstance, PartNetworkView, PartState, PartType};

/// Direction of an aspect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AspectKind {
    Read,
    Write,
}

impl AspectKind {
    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Read => "read",
            AspectKind::Write => "write",
        }
    }
}

/// Configurability of an aspect, fixed at construction
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AspectCapability {
    /// No properties, no configuration form
    #[default]
    Fixed,
    /// Declared property slots and their defaults
    Configurable {
        types: Vec<AspectPropertyTypeInstance>,
        defaults: AspectProperties,
    },
}

impl AspectCapability {
    pub fn configurable(types: Vec<AspectPropertyTypeInstance>, defaults: AspectProperties) -> Self {
        AspectCapability::Configurable { types, defaults }
    }

    pub fn has_properties(&self) -> bool {
        matches!(self, AspectCapability::Configurable { .. })
    }

    pub fn property_types(&self) -> &[AspectPropertyTypeInstance] {
        match self {
            AspectCapability::Fixed => &[],
            AspectCapability::Configurable { types, .. } => types,
        }
    }

    pub fn default_properties(&self) -> AspectProperties {
        match self {
            AspectCapability::Fixed => AspectProperties::new(),
            AspectCapability::Configurable { defaults, .. } => defaults.clone(),
        }
    }
}

/// A live aspect value as seen by variable consumers
#[derive(Clone, Debug, PartialEq)]
pub struct AspectVariable {
    pub value_type: ValueType,
    pub value: Value,
}

impl AspectVariable {
    pub fn new(value: Value) -> Self {
        AspectVariable {
            value_type: value.value_type(),
            value,
        }
    }

    pub fn to_compact_string(&self) -> String {
        self.value_type.to_compact_string(&self.value)
    }
}

/// Typed read or write capability of a part
pub trait Aspect: fmt::Debug + Send + Sync {
    /// Short name, unique per kind and value type
    fn name(&self) -> &str;

    fn kind(&self) -> AspectKind;

    fn value_type(&self) -> ValueType;

    fn capability(&self) -> &AspectCapability;

    fn unlocalized_name(&self) -> String {
        format!(
            "aspect.partnet.{}.{}.{}",
            self.kind().name(),
            self.value_type().type_name(),
            self.name()
        )
    }

    /// Per-tick hook, run after the owning part's own update
    fn update(
        &self,
        _network: &mut dyn PartNetworkView,
        _part_type: &dyn PartType,
        _target: &PartTarget,
        _state: &mut PartState,
    ) -> PartnetResult<()> {
        Ok(())
    }

    fn has_properties(&self) -> bool {
        self.capability().has_properties()
    }

    fn property_types(&self) -> &[AspectPropertyTypeInstance] {
        self.capability().property_types()
    }

    fn default_properties(&self) -> AspectProperties {
        self.capability().default_properties()
    }

    /// Properties of this aspect in one part, falling back to the defaults
    fn properties(&self, state: &PartState) -> AspectProperties {
        state
            .aspect_properties(&self.unlocalized_name())
            .cloned()
            .unwrap_or_else(|| self.default_properties())
    }

    /// Store properties for this aspect in one part
    fn set_properties(&self, state: &mut PartState, properties: AspectProperties) -> PartnetResult<()> {
        if !self.has_properties() {
            return Err(PartnetError::Validation(
                LocalizedMessage::new("partnet.aspect.error.no_properties")
                    .with_arg(self.unlocalized_name()),
            ));
        }
        properties.validate(self.property_types())?;
        state.set_aspect_properties(&self.unlocalized_name(), properties);
        Ok(())
    }

    fn tooltip(&self, lines: &mut Vec<String>, append_optional_info: bool) {
        lines.push(self.unlocalized_name());
        lines.push(self.value_type().unlocalized_name());
        if append_optional_info {
            for property in self.property_types() {
                lines.push(property.unlocalized_name());
            }
        }
    }
}

/// Orders aspects by value type, then by unlocalized name
pub struct AspectComparator;

impl AspectComparator {
    pub fn compare(a: &dyn Aspect, b: &dyn Aspect) -> Ordering {
        ValueTypeComparator::compare(a.value_type(), b.value_type())
            .then_with(|| a.unlocalized_name().cmp(&b.unlocalized_name()))
    }
}

type ReadFn = dyn Fn(&PartTarget, &PartState, &AspectProperties) -> PartnetResult<Value> + Send + Sync;

type WriteFn = dyn Fn(&mut dyn PartNetworkView, &PartTarget, &Value, &AspectProperties) -> PartnetResult<()>
    + Send
    + Sync;

/// Aspect that computes a value and publishes it into the part state
pub struct ReadAspect {
    name: String,
    value_type: ValueType,
    capability: AspectCapability,
    reader: Box<ReadFn>,
}

impl ReadAspect {
    pub fn new<F>(name: impl Into<String>, value_type: ValueType, reader: F) -> Self
    where
        F: Fn(&PartTarget, &PartState, &AspectProperties) -> PartnetResult<Value> + Send + Sync + 'static,
    {
        ReadAspect {
            name: name.into(),
            value_type,
            capability: AspectCapability::Fixed,
            reader: Box::new(reader),
        }
    }

    pub fn with_capability(mut self, capability: AspectCapability) -> Self {
        self.capability = capability;
        self
    }
}

impl fmt::Debug for ReadAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadAspect")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("capability", &self.capability)
            .finish()
    }
}

impl Aspect for ReadAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AspectKind {
        AspectKind::Read
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn capability(&self) -> &AspectCapability {
        &self.capability
    }

    fn update(
        &self,
        _network: &mut dyn PartNetworkView,
        _part_type: &dyn PartType,
        target: &PartTarget,
        state: &mut PartState,
    ) -> PartnetResult<()> {
        let properties = self.properties(state);
        let value = (self.reader)(target, state, &properties)?;
        if value.value_type() != self.value_type {
            return Err(PartnetError::Validation(
                LocalizedMessage::new("partnet.aspect.error.read_type")
                    .with_arg(self.unlocalized_name())
                    .with_arg(value.value_type()),
            ));
        }
        state.publish_variable(&self.unlocalized_name(), value);
        Ok(())
    }
}

/// Aspect that pushes its input variable into the world each update
pub struct WriteAspect {
    name: String,
    value_type: ValueType,
    capability: AspectCapability,
    writer: Box<WriteFn>,
}

impl WriteAspect {
    pub fn new<F>(name: impl Into<String>, value_type: ValueType, writer: F) -> Self
    where
        F: Fn(&mut dyn PartNetworkView, &PartTarget, &Value, &AspectProperties) -> PartnetResult<()>
            + Send
            + Sync
            + 'static,
    {
        WriteAspect {
            name: name.into(),
            value_type,
            capability: AspectCapability::Fixed,
            writer: Box::new(writer),
        }
    }

    pub fn with_capability(mut self, capability: AspectCapability) -> Self {
        self.capability = capability;
        self
    }
}

impl fmt::Debug for WriteAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteAspect")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("capability", &self.capability)
            .finish()
    }
}

impl Aspect for WriteAspect {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AspectKind {
        AspectKind::Write
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn capability(&self) -> &AspectCapability {
        &self.capability
    }

    fn update(
        &self,
        network: &mut dyn PartNetworkView,
        _part_type: &dyn PartType,
        target: &PartTarget,
        state: &mut PartState,
    ) -> PartnetResult<()> {
        let Some(input) = state.input(&self.unlocalized_name()).cloned() else {
            return Ok(());
        };
        let properties = self.properties(state);
        (self.writer)(network, target, &input, &properties)
    }
}
