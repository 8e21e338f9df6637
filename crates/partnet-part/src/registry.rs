//! Part type registry
//!
//! Part types are registered once at startup and looked up by the
//! `PartTypeId` stored in each part state.

use std::collections::HashMap;
use std::sync::Arc;

use partnet_core::{PartTypeId, PartnetError, PartnetResult};
use tracing::debug;

use crate::PartType;

/// Immutable-after-registration table of part types
#[derive(Default)]
pub struct PartTypeRegistry {
    types: Vec<Arc<dyn PartType>>,
    by_name: HashMap<String, PartTypeId>,
}

impl PartTypeRegistry {
    pub fn new() -> Self {
        PartTypeRegistry::default()
    }

    /// Register a part type under its unlocalized name
    pub fn register(&mut self, part_type: Arc<dyn PartType>) -> PartnetResult<PartTypeId> {
        let name = part_type.unlocalized_name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(PartnetError::DuplicatePartType(name));
        }
        let id = PartTypeId::new(self.types.len() as u32);
        debug!(part_type = %name, id = id.0, "registered part type");
        self.types.push(part_type);
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn get(&self, id: PartTypeId) -> PartnetResult<&Arc<dyn PartType>> {
        self.types
            .get(id.0 as usize)
            .ok_or(PartnetError::UnknownPartType(id))
    }

    pub fn id_of(&self, name: &str) -> PartnetResult<PartTypeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| PartnetError::UnknownPartTypeName(name.to_string()))
    }

    pub fn by_name(&self, name: &str) -> PartnetResult<&Arc<dyn PartType>> {
        self.get(self.id_of(name)?)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartTypeId, &Arc<dyn PartType>)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (PartTypeId::new(i as u32), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl PartType for Named {
        fn unlocalized_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PartTypeRegistry::new();
        let reader = registry.register(Arc::new(Named("parttype.partnet.reader"))).unwrap();
        let writer = registry.register(Arc::new(Named("parttype.partnet.writer"))).unwrap();

        assert_ne!(reader, writer);
        assert_eq!(registry.id_of("parttype.partnet.writer").unwrap(), writer);
        assert_eq!(
            registry.get(reader).unwrap().unlocalized_name(),
            "parttype.partnet.reader"
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = PartTypeRegistry::new();
        registry.register(Arc::new(Named("parttype.partnet.reader"))).unwrap();
        let err = registry.register(Arc::new(Named("parttype.partnet.reader"))).unwrap_err();
        assert_eq!(err, PartnetError::DuplicatePartType("parttype.partnet.reader".into()));
        assert!(registry.get(PartTypeId::new(5)).is_err());
    }
}
