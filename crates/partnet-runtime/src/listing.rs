//! Aspect listing - presentation model of a part overview

use std::sync::Arc;

use partnet_core::{PartTarget, ValueType};
use partnet_part::{Aspect, AspectComparator, PartState, PartType};

use crate::RuntimeResult;

/// One aspect as shown in a part overview
#[derive(Clone, Debug, PartialEq)]
pub struct AspectRow {
    pub name: String,
    pub value_type: ValueType,
    /// Compact rendering of the current value
    pub value: String,
    pub color: u32,
    pub configurable: bool,
}

/// Rows for every aspect of a part, in comparator order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AspectListing {
    pub part_type: String,
    pub rows: Vec<AspectRow>,
}

impl AspectListing {
    pub fn build(part_type: &dyn PartType, target: &PartTarget, state: &PartState) -> RuntimeResult<Self> {
        let mut aspects: Vec<&dyn Aspect> = part_type.aspects().iter().map(Arc::as_ref).collect();
        aspects.sort_by(|a, b| AspectComparator::compare(*a, *b));

        let mut rows = Vec::with_capacity(aspects.len());
        for aspect in aspects {
            let variable = part_type.variable(target, state, aspect)?;
            rows.push(AspectRow {
                name: aspect.unlocalized_name(),
                value_type: variable.value_type,
                value: variable.to_compact_string(),
                color: variable.value_type.display_color(),
                configurable: aspect.has_properties(),
            });
        }

        Ok(AspectListing {
            part_type: part_type.unlocalized_name().to_string(),
            rows,
        })
    }

    pub fn row(&self, name: &str) -> Option<&AspectRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}
