//! Construction strategies

use std::fmt;
use std::sync::Arc;

use crate::{DiResult, Instance, Resolver};

/// A factory producing type-erased instances, as stored by registrations.
pub type ErasedFactory = Arc<dyn Fn(&dyn Resolver) -> DiResult<Instance> + Send + Sync>;

/// Constructs values of `T`, resolving any dependencies through the given
/// resolver.
pub struct Factory<T> {
    inner: Arc<dyn Fn(&dyn Resolver) -> DiResult<T> + Send + Sync>,
}

impl<T: 'static> Factory<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Resolver) -> DiResult<T> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, resolver: &dyn Resolver) -> DiResult<T> {
        (self.inner)(resolver)
    }

    /// A factory that transforms every value this one produces.
    pub fn map<U, F>(self, f: F) -> Factory<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Factory::new(move |resolver| self.call(resolver).map(&f))
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiError, TypeInfo};

    struct NoResolver;

    impl Resolver for NoResolver {
        fn resolve(&self, type_info: &TypeInfo) -> DiResult<Instance> {
            Err(DiError::UnknownType {
                type_info: type_info.clone(),
            })
        }
    }

    #[test]
    fn test_map() {
        let factory = Factory::new(|_| Ok(20)).map(|n| n + 1).map(|n: i32| n * 2);
        assert_eq!(factory.call(&NoResolver).unwrap(), 42);
    }

    #[test]
    fn test_errors_pass_through_map() {
        let factory = Factory::<i32>::new(|_| Err(anyhow::anyhow!("boom").into())).map(|n| n + 1);
        let err = factory.call(&NoResolver).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
