//! Component type descriptors and instance validation.
//!
//! A component type is described by data, not by a Rust type: the descriptor
//! carries the field schema (name, description, default value) plus an
//! optional validation hook for constraints the schema cannot express, such
//! as a non-negative-integer rule on a counter field. Instance data is a
//! `serde_json::Value` object validated against the descriptor.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised by component registration, lookup, and validation.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A component type with this id is already registered.
    #[error("component type '{0}' is already registered")]
    DuplicateComponentType(String),

    /// No component type with this id is registered.
    #[error("unknown component type: {0}")]
    UnknownComponentType(String),

    /// Component data does not conform to the type's schema.
    #[error("schema violation on '{component}': {message}")]
    SchemaViolation {
        /// The component type id the data was validated against.
        component: String,
        /// Human-readable description of the violation.
        message: String,
    },
}

/// Custom validation hook run after structural checks pass.
///
/// Returns a message describing the violation, or `Ok(())`.
pub type ValidateFn = Arc<dyn Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync>;

/// Schema entry for a single component field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Human-readable description of the field.
    pub description: String,
    /// Default value, also used to kind-check incoming data. A `null`
    /// default accepts any JSON kind.
    pub default: Value,
}

impl FieldSpec {
    /// Create a field spec with a description and default value.
    pub fn new(description: impl Into<String>, default: Value) -> Self {
        Self {
            description: description.into(),
            default,
        }
    }
}

/// Describes one component type: its unique id, field schema, and an
/// optional validation hook.
#[derive(Clone)]
pub struct ComponentDescriptor {
    id: String,
    schema: BTreeMap<String, FieldSpec>,
    validator: Option<ValidateFn>,
}

impl std::fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl ComponentDescriptor {
    /// Create a descriptor with the given globally unique type id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema: BTreeMap::new(),
            validator: None,
        }
    }

    /// Add a field to the schema. Later additions with the same name
    /// overwrite earlier ones.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.schema.insert(name.into(), spec);
        self
    }

    /// Attach a custom validation hook, run after structural validation.
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// The component type id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The field schema.
    #[must_use]
    pub fn schema(&self) -> &BTreeMap<String, FieldSpec> {
        &self.schema
    }

    /// Build the default-filled instance data for this type.
    #[must_use]
    pub fn defaults(&self) -> Value {
        let mut object = Map::new();
        for (name, spec) in &self.schema {
            object.insert(name.clone(), spec.default.clone());
        }
        Value::Object(object)
    }

    /// Validate instance data against this descriptor.
    ///
    /// Data must be a JSON object, carry every schema field and no unknown
    /// fields, and each value must match the JSON kind of the field's
    /// default. The custom hook, if any, runs last.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::SchemaViolation`] describing the first
    /// violation found.
    pub fn validate(&self, data: &Value) -> Result<(), ComponentError> {
        let object = data
            .as_object()
            .ok_or_else(|| self.violation("component data must be a JSON object"))?;

        for name in object.keys() {
            if !self.schema.contains_key(name) {
                return Err(self.violation(format!("unknown field '{name}'")));
            }
        }

        for (name, spec) in &self.schema {
            let value = object
                .get(name)
                .ok_or_else(|| self.violation(format!("missing field '{name}'")))?;
            if !spec.default.is_null() && json_kind(value) != json_kind(&spec.default) {
                return Err(self.violation(format!(
                    "field '{name}': expected {}, got {}",
                    json_kind(&spec.default),
                    json_kind(value)
                )));
            }
        }

        if let Some(validator) = &self.validator {
            validator(object).map_err(|message| self.violation(message))?;
        }

        Ok(())
    }

    fn violation(&self, message: impl Into<String>) -> ComponentError {
        ComponentError::SchemaViolation {
            component: self.id.clone(),
            message: message.into(),
        }
    }
}

/// A factory for producing validated, default-filled instances of one
/// component type. Returned by registration; cheap to clone.
#[derive(Debug, Clone)]
pub struct ComponentFactory {
    descriptor: Arc<ComponentDescriptor>,
}

impl ComponentFactory {
    pub(crate) fn new(descriptor: Arc<ComponentDescriptor>) -> Self {
        Self { descriptor }
    }

    /// The descriptor this factory produces instances of.
    #[must_use]
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// Produce instance data: the type's defaults overlaid field-by-field
    /// with `overrides`, then validated.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::SchemaViolation`] if an override names an
    /// unknown field or the merged data fails validation.
    pub fn instantiate(&self, overrides: Option<&Map<String, Value>>) -> Result<Value, ComponentError> {
        let mut object = Map::new();
        for (name, spec) in self.descriptor.schema() {
            object.insert(name.clone(), spec.default.clone());
        }
        if let Some(overrides) = overrides {
            for (name, value) in overrides {
                if !self.descriptor.schema().contains_key(name) {
                    return Err(ComponentError::SchemaViolation {
                        component: self.descriptor.id().to_string(),
                        message: format!("unknown field '{name}'"),
                    });
                }
                object.insert(name.clone(), value.clone());
            }
        }
        let data = Value::Object(object);
        self.descriptor.validate(&data)?;
        Ok(data)
    }
}

/// Name of a JSON value's kind, for schema kind-checks and error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ticks_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::new("time")
            .field("ticks", FieldSpec::new("elapsed ticks", json!(0)))
            .with_validator(|data| match data.get("ticks").and_then(Value::as_u64) {
                Some(_) => Ok(()),
                None => Err("ticks must be a non-negative integer".to_string()),
            })
    }

    #[test]
    fn test_defaults_follow_schema() {
        let descriptor = ticks_descriptor();
        assert_eq!(descriptor.defaults(), json!({"ticks": 0}));
    }

    #[test]
    fn test_validate_accepts_conforming_data() {
        let descriptor = ticks_descriptor();
        assert!(descriptor.validate(&json!({"ticks": 7})).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let descriptor = ticks_descriptor();
        let err = descriptor.validate(&json!({})).unwrap_err();
        assert!(matches!(err, ComponentError::SchemaViolation { .. }));
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let descriptor = ticks_descriptor();
        assert!(descriptor.validate(&json!({"ticks": 0, "extra": 1})).is_err());
    }

    #[test]
    fn test_validate_rejects_kind_mismatch() {
        let descriptor = ticks_descriptor();
        assert!(descriptor.validate(&json!({"ticks": "three"})).is_err());
    }

    #[test]
    fn test_custom_hook_rejects_negative_ticks() {
        let descriptor = ticks_descriptor();
        let err = descriptor.validate(&json!({"ticks": -1})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("non-negative"), "unexpected message: {message}");
    }

    #[test]
    fn test_factory_overlays_overrides_on_defaults() {
        let factory = ComponentFactory::new(Arc::new(ticks_descriptor()));
        assert_eq!(factory.instantiate(None).unwrap(), json!({"ticks": 0}));

        let mut overrides = Map::new();
        overrides.insert("ticks".to_string(), json!(5));
        assert_eq!(
            factory.instantiate(Some(&overrides)).unwrap(),
            json!({"ticks": 5})
        );
    }

    #[test]
    fn test_factory_rejects_unknown_override() {
        let factory = ComponentFactory::new(Arc::new(ticks_descriptor()));
        let mut overrides = Map::new();
        overrides.insert("nope".to_string(), json!(1));
        assert!(factory.instantiate(Some(&overrides)).is_err());
    }

    #[test]
    fn test_null_default_accepts_any_kind() {
        let descriptor = ComponentDescriptor::new("tag")
            .field("payload", FieldSpec::new("anything goes", Value::Null));
        assert!(descriptor.validate(&json!({"payload": 3})).is_ok());
        assert!(descriptor.validate(&json!({"payload": "text"})).is_ok());
        assert!(descriptor.validate(&json!({"payload": {"nested": true}})).is_ok());
    }
}
