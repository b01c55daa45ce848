//! Layer factory registry.
//!
//! Maps a block type name to the factory that builds layers of that type.
//! The registry is meant to be populated during setup and then shared across
//! many inflation runs; lookups and registrations are serialized through a
//! read-write lock so concurrent use is sound.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::args::ArgumentsBundle;
use crate::error::{BoxError, InflationError};

/// Error type returned by factories. Tagged [`InflationError`]s pass through
/// the inflater as-is; anything else gets wrapped as `INFLATING_LAYER_GENERIC`.
pub type LayerError = BoxError;

/// Builds one layer from the arguments of a block.
///
/// Factories must not attach line numbers to their errors; the inflater does.
pub trait LayerFactory<L>: Send + Sync {
    fn build(&self, args: &ArgumentsBundle) -> Result<L, LayerError>;
}

impl<L, F> LayerFactory<L> for F
where
    F: Fn(&ArgumentsBundle) -> Result<L, LayerError> + Send + Sync,
{
    fn build(&self, args: &ArgumentsBundle) -> Result<L, LayerError> {
        self(args)
    }
}

/// Registry of layer factories keyed by exact, case-sensitive type name.
pub struct LayerRegistry<L> {
    factories: RwLock<BTreeMap<String, Arc<dyn LayerFactory<L>>>>,
}

impl<L> LayerRegistry<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a factory, replacing any earlier one for the same name.
    ///
    /// Returns the replaced factory, if any.
    pub fn register<F>(
        &self,
        type_name: impl Into<String>,
        factory: F,
    ) -> Option<Arc<dyn LayerFactory<L>>>
    where
        F: LayerFactory<L> + 'static,
    {
        self.register_arc(type_name, Arc::new(factory))
    }

    /// Register a closure as a factory.
    pub fn register_fn<F>(
        &self,
        type_name: impl Into<String>,
        factory: F,
    ) -> Option<Arc<dyn LayerFactory<L>>>
    where
        F: Fn(&ArgumentsBundle) -> Result<L, LayerError> + Send + Sync + 'static,
    {
        self.register(type_name, factory)
    }

    /// Register an already shared factory.
    pub fn register_arc(
        &self,
        type_name: impl Into<String>,
        factory: Arc<dyn LayerFactory<L>>,
    ) -> Option<Arc<dyn LayerFactory<L>>> {
        let type_name = type_name.into();
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        let previous = factories.insert(type_name.clone(), factory);
        if previous.is_some() {
            warn!(layer_type = %type_name, "replacing registered layer factory");
        } else {
            debug!(layer_type = %type_name, "registered layer factory");
        }
        previous
    }

    /// Look up the factory for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn LayerFactory<L>>> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn known_types(&self) -> Vec<String> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factories.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a layer with the factory registered for `type_name`.
    ///
    /// The lock is released before the factory runs, so factories may use
    /// the registry themselves.
    pub fn build(&self, type_name: &str, args: &ArgumentsBundle) -> Result<L, LayerError> {
        let factory = self
            .get(type_name)
            .ok_or_else(|| InflationError::unknown_layer_type(type_name, &self.known_types()))?;
        factory.build(args)
    }
}

impl<L> Default for LayerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> fmt::Debug for LayerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("types", &self.known_types())
            .finish()
    }
}
