use std::{collections::HashMap, sync::Arc};

use tracing::{debug, instrument};

use crate::{Error, InternalResult, config::DslSettings, locator::is_valid_identifier};

use super::{Transpiler, create_transpiler};

/// Maps Fusion-DSL identifiers to their transpilers.
///
/// Built once per run from the `dsl` settings table and only read after
/// that. Resolving the same identifier twice hands out the same transpiler.
#[derive(Clone, Default)]
pub struct TranspilerRegistry {
    transpilers: HashMap<String, Arc<dyn Transpiler>>,
}

impl std::fmt::Debug for TranspilerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspilerRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

impl TranspilerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(settings))]
    pub fn from_settings(settings: &DslSettings) -> InternalResult<Self> {
        let mut registry = Self::new();
        for (identifier, descriptor) in settings.dsl.iter() {
            registry.register(identifier, create_transpiler(descriptor))?;
        }
        debug!(count = registry.len(), "transpilers registered");
        Ok(registry)
    }

    pub fn register(
        &mut self,
        identifier: &str,
        transpiler: Arc<dyn Transpiler>,
    ) -> InternalResult<()> {
        if !is_valid_identifier(identifier) {
            return Err(Error::InvalidIdentifier(identifier.to_string()));
        }
        self.transpilers.insert(identifier.to_string(), transpiler);
        Ok(())
    }

    pub fn resolve(&self, identifier: &str) -> InternalResult<Arc<dyn Transpiler>> {
        self.transpilers
            .get(identifier)
            .cloned()
            .ok_or_else(|| Error::UnknownDslIdentifier(identifier.to_string()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.transpilers.contains_key(identifier)
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.transpilers.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.transpilers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transpilers.is_empty()
    }
}
