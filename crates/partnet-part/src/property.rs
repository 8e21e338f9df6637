//! Aspect properties
//!
//! A configurable aspect declares a set of typed property slots. The values
//! live in an `AspectProperties` record stored per part state, so two parts
//! sharing the same aspect never share property values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use partnet_core::{LocalizedMessage, PartnetError, PartnetResult, Value, ValueType};

/// One declared property slot of an aspect
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AspectPropertyTypeInstance {
    /// Key inside the property record
    pub key: String,
    /// Type every value under this key must have
    pub value_type: ValueType,
}

impl AspectPropertyTypeInstance {
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Self {
        AspectPropertyTypeInstance {
            key: key.into(),
            value_type,
        }
    }

    pub fn unlocalized_name(&self) -> String {
        format!("aspect.partnet.property.{}", self.key)
    }
}

/// Property values of one (aspect, part state) pair
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectProperties {
    values: BTreeMap<String, Value>,
}

impl AspectProperties {
    pub fn new() -> Self {
        AspectProperties::default()
    }

    /// Builder-style insert without type checks, for defaults
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a declared property, rejecting values of the wrong type
    pub fn set(&mut self, property: &AspectPropertyTypeInstance, value: Value) -> PartnetResult<()> {
        if value.value_type() != property.value_type {
            return Err(PartnetError::Validation(
                LocalizedMessage::new("partnet.aspect.property.error.type")
                    .with_arg(&property.key)
                    .with_arg(property.value_type)
                    .with_arg(value.value_type()),
            ));
        }
        self.values.insert(property.key.clone(), value);
        Ok(())
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_double)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// All stored keys, including ones no longer declared by the aspect
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check every declared slot holds a value of its declared type
    pub fn validate(&self, types: &[AspectPropertyTypeInstance]) -> PartnetResult<()> {
        for property in types {
            if let Some(value) = self.values.get(&property.key) {
                if value.value_type() != property.value_type {
                    return Err(PartnetError::Validation(
                        LocalizedMessage::new("partnet.aspect.property.error.type")
                            .with_arg(&property.key)
                            .with_arg(property.value_type)
                            .with_arg(value.value_type()),
                    ));
                }
            }
        }
        Ok(())
    }
}
