//! Memoized instance storage

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::{DiResult, ErasedFactory, Instance, Resolver, TypeInfo};

/// Holds at most one instance per type.
///
/// Construction of each type is serialized by its own gate, so a factory can
/// resolve other types from the same cache while it runs.
#[derive(Default)]
pub struct InstanceCache {
    instances: RwLock<HashMap<TypeId, Instance>>,
    gates: Mutex<HashMap<TypeId, Arc<Mutex<()>>>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance of `type_info`, calling `factory` to create
    /// it if there is none. The factory runs at most once per type; failures
    /// are not cached.
    pub fn resolve(
        &self,
        type_info: &TypeInfo,
        factory: &ErasedFactory,
        resolver: &dyn Resolver,
    ) -> DiResult<Instance> {
        if let Some(instance) = self.get(type_info) {
            trace!(type_name = type_info.name(), "Cache hit");
            return Ok(instance);
        }

        let gate = Arc::clone(self.gates.lock().entry(type_info.id()).or_default());
        let _guard = gate.lock();

        if let Some(instance) = self.get(type_info) {
            trace!(type_name = type_info.name(), "Cache hit after waiting");
            return Ok(instance);
        }

        let instance = factory(resolver)?;
        self.instances
            .write()
            .insert(type_info.id(), instance.clone());
        debug!(type_name = type_info.name(), "Cached new instance");
        Ok(instance)
    }

    pub fn get(&self, type_info: &TypeInfo) -> Option<Instance> {
        self.instances.read().get(&type_info.id()).cloned()
    }

    /// A snapshot of every cached instance.
    pub fn values(&self) -> Vec<Instance> {
        self.instances.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }
}
