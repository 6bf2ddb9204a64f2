//! Named condition registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Error produced by a condition predicate
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("probe failed: {0}")]
    Probe(String),

    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),
}

/// A zero-argument predicate, re-evaluated every time its step is reached
pub type Predicate = Arc<dyn Fn() -> Result<bool, ConditionError> + Send + Sync>;

/// Registry of named conditions that gate sequence steps
#[derive(Clone, Default)]
pub struct ConditionRegistry {
    conditions: HashMap<String, Predicate>,
}

impl ConditionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible predicate, overwriting any existing one
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.register_fallible(name, move || Ok(predicate()));
    }

    /// Register a predicate that can fail, overwriting any existing one
    pub fn register_fallible<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn() -> Result<bool, ConditionError> + Send + Sync + 'static,
    {
        self.conditions.insert(name.into(), Arc::new(predicate));
    }

    /// Whether a condition with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// Number of registered conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate a named condition
    ///
    /// An unregistered name passes vacuously (with a warning); a predicate
    /// that fails does not. Results are never cached — every call runs the
    /// predicate again.
    pub fn evaluate(&self, name: &str) -> bool {
        let Some(predicate) = self.conditions.get(name) else {
            warn!(condition = name, "condition not found, assuming true");
            return true;
        };

        match predicate() {
            Ok(result) => {
                debug!(condition = name, result, "condition evaluated");
                result
            }
            Err(e) => {
                error!(condition = name, error = %e, "error checking condition");
                false
            }
        }
    }
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRegistry")
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .finish()
    }
}
