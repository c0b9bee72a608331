//! System catalog — named factories for blueprint-driven system injection.
//!
//! Behaviour cannot be deserialized off the wire, so dynamic injection
//! resolves a blueprint's kind name against factories registered at
//! bootstrap. The factory receives the blueprint's params and builds a
//! concrete system instance.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::system::{System, SystemFault};

/// Errors raised by catalog registration and blueprint resolution.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A factory for this blueprint kind is already registered.
    #[error("system blueprint '{0}' is already registered")]
    DuplicateBlueprint(String),

    /// No factory is registered for this blueprint kind.
    #[error("unknown system blueprint: {0}")]
    UnknownBlueprint(String),

    /// The factory rejected the blueprint's params.
    #[error("system blueprint '{kind}' failed to construct: {fault}")]
    Construction {
        /// The blueprint kind that failed.
        kind: String,
        /// The fault raised by the factory.
        fault: SystemFault,
    },
}

type SystemFactory = Box<dyn Fn(&Value) -> Result<Box<dyn System>, SystemFault> + Send + Sync>;

/// Registry of system factories, keyed by blueprint kind name.
#[derive(Default)]
pub struct SystemCatalog {
    factories: HashMap<String, SystemFactory>,
}

impl SystemCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under a blueprint kind name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateBlueprint`] on a repeated kind name.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(&Value) -> Result<Box<dyn System>, SystemFault> + Send + Sync + 'static,
    ) -> Result<(), CatalogError> {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(CatalogError::DuplicateBlueprint(kind));
        }
        self.factories.insert(kind, Box::new(factory));
        Ok(())
    }

    /// Build a system from a blueprint kind and its params.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBlueprint`] for an unregistered kind,
    /// or [`CatalogError::Construction`] if the factory rejects the params.
    pub fn create(&self, kind: &str, params: &Value) -> Result<Box<dyn System>, CatalogError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| CatalogError::UnknownBlueprint(kind.to_string()))?;
        factory(params).map_err(|fault| CatalogError::Construction {
            kind: kind.to_string(),
            fault,
        })
    }

    /// Returns `true` if a factory is registered for this kind.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}
