//! Resolution by type

use crate::{DiError, DiResult, Instance, Reflect, TypeInfo};

/// Something that produces instances of registered types.
///
/// The instance returned for a type must downcast to that type.
pub trait Resolver {
    fn resolve(&self, type_info: &TypeInfo) -> DiResult<Instance>;
}

/// Resolves a `T` from `resolver`.
///
/// Errors from the resolver are wrapped in [`DiError::Resolver`]; use
/// [`DiError::is`] to match the underlying kind.
pub fn resolve<T: Reflect + Clone>(resolver: Option<&dyn Resolver>) -> DiResult<T> {
    let resolver = resolver.ok_or(DiError::NilResolver)?;
    resolve_from(resolver)
}

pub fn resolve_from<T: Reflect + Clone>(resolver: &dyn Resolver) -> DiResult<T> {
    let requested = T::type_info();
    let instance = resolver.resolve(&requested).map_err(DiError::resolver)?;
    instance
        .downcast::<T>()
        .ok_or_else(|| DiError::InvalidResolution {
            requested,
            returned: instance.type_info().clone(),
        })
}
