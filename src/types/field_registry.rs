use std::collections::HashMap;

use super::error::CatalogError;
use super::field::{ContextFieldDefinition, FieldType};

/// Read-only registry of [`ContextFieldDefinition`]s keyed by field key.
///
/// Definitions are stored in registration order in a flat `Vec`, with a
/// key-to-index map for lookups.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    definitions: Vec<ContextFieldDefinition>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateField`] if the key is already registered.
    pub(crate) fn register(
        &mut self,
        definition: ContextFieldDefinition,
    ) -> Result<usize, CatalogError> {
        if self.index.contains_key(&definition.key) {
            return Err(CatalogError::DuplicateField {
                key: definition.key,
            });
        }
        let idx = self.definitions.len();
        self.index.insert(definition.key.clone(), idx);
        self.definitions.push(definition);
        Ok(idx)
    }

    /// Look up a definition by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextFieldDefinition> {
        self.index.get(key).map(|&idx| &self.definitions[idx])
    }

    /// The declared type of a field, if registered.
    #[must_use]
    pub fn field_type(&self, key: &str) -> Option<FieldType> {
        self.get(key).map(|d| d.field_type)
    }

    /// The number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ContextFieldDefinition> {
        self.definitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut reg = FieldRegistry::new();
        let idx = reg
            .register(ContextFieldDefinition::new("userLevel", FieldType::Number))
            .unwrap();
        assert_eq!(idx, 0);
        assert_eq!(reg.field_type("userLevel"), Some(FieldType::Number));
    }

    #[test]
    fn duplicate_register_is_rejected() {
        let mut reg = FieldRegistry::new();
        reg.register(ContextFieldDefinition::new("country", FieldType::Country))
            .unwrap();
        let err = reg
            .register(ContextFieldDefinition::new("country", FieldType::String))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateField { key } if key == "country"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn iteration_keeps_registration_order() {
        let mut reg = FieldRegistry::new();
        for key in ["platform", "appVersion", "country"] {
            reg.register(ContextFieldDefinition::new(key, FieldType::String))
                .unwrap();
        }
        let keys: Vec<&str> = reg.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["platform", "appVersion", "country"]);
    }

    #[test]
    fn get_missing_returns_none() {
        let reg = FieldRegistry::new();
        assert!(reg.get("nonexistent").is_none());
        assert_eq!(reg.field_type("nonexistent"), None);
    }

    #[test]
    fn empty_registry() {
        let reg = FieldRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }
}
