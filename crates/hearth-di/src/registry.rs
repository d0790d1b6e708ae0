//! Registration of target types

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    DiError, DiResult, ErasedFactory, Factory, Kind, Lifetime, ProviderConfig, Reflect,
    Resolver, RootProvider, TypeInfo, Upcast,
};

/// How a target type is constructed and cached
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) target: TypeInfo,
    pub(crate) lifetime: Lifetime,
    pub(crate) factory: ErasedFactory,
}

/// A set of registrations from which a [`RootProvider`] is built.
///
/// Registering returns a new registry and leaves the receiver untouched, so a
/// failed registration has no effect. Registering a target again replaces the
/// earlier registration.
///
/// ```rust
/// use std::sync::Arc;
/// use hearth_di::{Lifetime, Registry};
///
/// let provider = Registry::new()
///     .register_type::<Arc<String>, Arc<String>>(Lifetime::SINGLETON)
///     .unwrap()
///     .build_root_provider();
///
/// let a = provider.get::<Arc<String>>().unwrap();
/// let b = provider.get::<Arc<String>>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    registrations: HashMap<TypeId, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `Impl` as the implementation of `Target`, constructed by its
    /// default factory.
    pub fn register_type<Target, Impl>(&self, lifetime: Lifetime) -> DiResult<Registry>
    where
        Target: Reflect,
        Impl: Reflect + Send + Sync,
    {
        let upcast = assignable::<Target, Impl>()?;
        let factory = Impl::default_factory()?;
        check_lifetime::<Impl>(lifetime)?;
        Ok(self.insert(lifetime, upcast, factory))
    }

    /// Registers `Impl` as the implementation of `Target`, constructed by
    /// `factory`.
    pub fn register_factory<Target, Impl>(
        &self,
        lifetime: Lifetime,
        factory: impl Into<Option<Factory<Impl>>>,
    ) -> DiResult<Registry>
    where
        Target: Reflect,
        Impl: Reflect + Send + Sync,
    {
        let upcast = assignable::<Target, Impl>()?;
        check_lifetime::<Impl>(lifetime)?;
        let factory = factory.into().ok_or(DiError::NilFactory)?;
        Ok(self.insert(lifetime, upcast, factory))
    }

    fn insert<Impl>(&self, lifetime: Lifetime, upcast: Upcast<Impl>, factory: Factory<Impl>) -> Registry
    where
        Impl: Reflect + Send + Sync,
    {
        let target = upcast.target().clone();
        debug!(
            target = target.name(),
            implementation = Impl::type_info().name(),
            %lifetime,
            "Registered type"
        );

        let erased: ErasedFactory = Arc::new(move |resolver: &dyn Resolver| {
            factory.call(resolver).map(|value| upcast.apply(value))
        });

        let mut registrations = self.registrations.clone();
        registrations.insert(
            target.id(),
            Registration {
                target,
                lifetime,
                factory: erased,
            },
        );
        Registry { registrations }
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn contains<T: Reflect + ?Sized>(&self) -> bool {
        self.registrations.contains_key(&T::type_info().id())
    }

    pub fn lifetime_of<T: Reflect + ?Sized>(&self) -> Option<Lifetime> {
        self.registrations
            .get(&T::type_info().id())
            .map(|registration| registration.lifetime)
    }

    /// Builds a root provider over a copy of the current registrations.
    pub fn build_root_provider(&self) -> RootProvider {
        self.build_root_provider_with(ProviderConfig::default())
    }

    pub fn build_root_provider_with(&self, config: ProviderConfig) -> RootProvider {
        RootProvider::new(self.registrations.clone(), config)
    }
}

/// Finds the conversion from `Impl` to `Target`, if `Impl` is concrete and
/// assignable to `Target`.
fn assignable<Target, Impl>() -> DiResult<Upcast<Impl>>
where
    Target: Reflect,
    Impl: Reflect + Send + Sync,
{
    let target = Target::type_info();
    let implementation = Impl::type_info();

    if !implementation.is_concrete() {
        return Err(DiError::NonConcreteImplementation {
            type_info: implementation,
        });
    }
    if target == implementation {
        return Ok(Upcast::identity());
    }
    if target.kind() == Kind::Interface {
        if let Some(upcast) = Impl::upcasts()
            .into_iter()
            .find(|upcast| upcast.target() == &target)
        {
            return Ok(upcast);
        }
    }
    Err(DiError::InvalidImplementation {
        implementation,
        target,
    })
}

fn check_lifetime<Impl: Reflect>(lifetime: Lifetime) -> DiResult<()> {
    let lifetime = lifetime.validate()?;
    let implementation = Impl::type_info();
    if lifetime != Lifetime::TRANSIENT && !implementation.is_sharable() {
        return Err(DiError::UnsharableType {
            type_info: implementation,
            lifetime,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_registration_does_not_mutate_receiver() {
        let empty = Registry::new();
        let one = empty
            .register_type::<Arc<String>, Arc<String>>(Lifetime::SINGLETON)
            .unwrap();

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(one.contains::<Arc<String>>());
        assert_eq!(one.lifetime_of::<Arc<String>>(), Some(Lifetime::SINGLETON));
        assert_eq!(one.lifetime_of::<String>(), None);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = Registry::new()
            .register_type::<Arc<i32>, Arc<i32>>(Lifetime::SINGLETON)
            .unwrap()
            .register_type::<Arc<i32>, Arc<i32>>(Lifetime::TRANSIENT)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lifetime_of::<Arc<i32>>(), Some(Lifetime::TRANSIENT));
    }

    #[test]
    fn test_failed_registration_leaves_registry_unchanged() {
        let registry = Registry::new()
            .register_type::<Arc<i32>, Arc<i32>>(Lifetime::SCOPED)
            .unwrap();

        let err = registry
            .register_type::<Vec<i32>, Vec<i32>>(Lifetime::SINGLETON)
            .err()
            .unwrap();
        assert!(err.is(ErrorKind::UnsharableType));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lifetime_checked_before_sharability() {
        let err = Registry::new()
            .register_type::<Vec<i32>, Vec<i32>>(Lifetime::from_raw(9))
            .err()
            .unwrap();
        assert!(matches!(err, DiError::UndefinedLifetime { value: 9 }));
    }

    #[test]
    fn test_nil_factory_checked_last() {
        let err = Registry::new()
            .register_factory::<Arc<u8>, Arc<u8>>(Lifetime::from_raw(0), None::<Factory<Arc<u8>>>)
            .err()
            .unwrap();
        assert!(err.is(ErrorKind::UndefinedLifetime));

        let err = Registry::new()
            .register_factory::<Arc<u8>, Arc<u8>>(Lifetime::SINGLETON, None::<Factory<Arc<u8>>>)
            .err()
            .unwrap();
        assert!(err.is(ErrorKind::NilFactory));
    }
}
