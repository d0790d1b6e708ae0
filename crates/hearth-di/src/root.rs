//! The root resolution context

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::registry::Registration;
use crate::{
    resolve, DiError, DiResult, Instance, InstanceCache, Lifetime, ProviderConfig, Reflect,
    Resolver, Scope, TypeInfo,
};

/// Resolves transient and singleton values, and creates [`Scope`]s for
/// scoped ones.
///
/// Clones share the same registrations and singleton instances.
#[derive(Clone)]
pub struct RootProvider {
    inner: Arc<RootInner>,
}

struct RootInner {
    registrations: HashMap<TypeId, Registration>,
    singletons: InstanceCache,
    config: ProviderConfig,
}

impl RootProvider {
    pub(crate) fn new(registrations: HashMap<TypeId, Registration>, config: ProviderConfig) -> Self {
        debug!(
            registrations = registrations.len(),
            close_timeout_ms = config.close_timeout_ms,
            "Built root provider"
        );
        Self {
            inner: Arc::new(RootInner {
                registrations,
                singletons: InstanceCache::new(),
                config,
            }),
        }
    }

    /// Creates a scope that resolves scoped values in addition to transient and
    /// singleton ones.
    pub fn new_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.inner.config
    }

    /// Resolves a `T`.
    pub fn get<T: Reflect + Clone>(&self) -> DiResult<T> {
        resolve::<T>(Some(self))
    }

    pub(crate) fn registration(&self, type_info: &TypeInfo) -> Option<&Registration> {
        self.inner.registrations.get(&type_info.id())
    }

    pub(crate) fn log_resolution(&self, registration: &Registration) {
        if self.inner.config.log_resolutions {
            debug!(
                type_name = registration.target.name(),
                lifetime = %registration.lifetime,
                "Resolving"
            );
        } else {
            trace!(
                type_name = registration.target.name(),
                lifetime = %registration.lifetime,
                "Resolving"
            );
        }
    }
}

impl Resolver for RootProvider {
    fn resolve(&self, type_info: &TypeInfo) -> DiResult<Instance> {
        let registration = self
            .registration(type_info)
            .ok_or_else(|| DiError::UnknownType {
                type_info: type_info.clone(),
            })?;
        self.log_resolution(registration);

        match registration.lifetime {
            Lifetime::TRANSIENT => (registration.factory)(self),
            Lifetime::SCOPED => Err(DiError::ScopedValueRequestedFromRootProvider {
                type_info: type_info.clone(),
            }),
            Lifetime::SINGLETON => {
                self.inner
                    .singletons
                    .resolve(type_info, &registration.factory, self)
            }
            other => unreachable!("registration for {type_info} has undefined lifetime {}", other.value()),
        }
    }
}
