//! Error types for registration and resolution

use crate::{Lifetime, TypeInfo};

/// Errors that can occur during dependency injection operations
#[derive(Debug, thiserror::Error)]
pub enum DiError {
    #[error("implementation type {type_info} is not a concrete type")]
    NonConcreteImplementation { type_info: TypeInfo },

    #[error("implementation type {implementation} is not assignable to target type {target}")]
    InvalidImplementation {
        implementation: TypeInfo,
        target: TypeInfo,
    },

    #[error("undefined lifetime: {value}")]
    UndefinedLifetime { value: u8 },

    #[error("undefined lifetime name: {name:?}")]
    UndefinedLifetimeName { name: String },

    #[error("unsharable type {type_info} cannot be registered with non-Transient lifetime {lifetime}")]
    UnsharableType {
        type_info: TypeInfo,
        lifetime: Lifetime,
    },

    #[error("implementation type {type_info} has no default factory")]
    NoDefaultFactory { type_info: TypeInfo },

    #[error("factory cannot be nil")]
    NilFactory,

    #[error("requested type {type_info} is unknown to the provider")]
    UnknownType { type_info: TypeInfo },

    #[error("root provider cannot resolve a scoped value of type {type_info}")]
    ScopedValueRequestedFromRootProvider { type_info: TypeInfo },

    #[error("cannot resolve instances from nil resolver")]
    NilResolver,

    #[error("resolver error: {0}")]
    Resolver(#[source] Box<DiError>),

    #[error("value from resolver has type {returned} when {requested} was requested")]
    InvalidResolution {
        requested: TypeInfo,
        returned: TypeInfo,
    },

    #[error(transparent)]
    Factory(#[from] anyhow::Error),
}

pub type DiResult<T> = Result<T, DiError>;

/// Sentinel category of a [`DiError`], for branching without inspecting fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NonConcreteImplementation,
    InvalidImplementation,
    UndefinedLifetime,
    UnsharableType,
    NoDefaultFactory,
    NilFactory,
    UnknownType,
    ScopedValueRequestedFromRootProvider,
    NilResolver,
    ResolverError,
    InvalidResolution,
    Factory,
}

impl DiError {
    /// Wraps an error returned by a [`Resolver`](crate::Resolver).
    pub fn resolver(err: DiError) -> Self {
        DiError::Resolver(Box::new(err))
    }

    /// The category of this error. Wrapped resolver errors report
    /// [`ErrorKind::ResolverError`]; use [`DiError::is`] to look through them.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiError::NonConcreteImplementation { .. } => ErrorKind::NonConcreteImplementation,
            DiError::InvalidImplementation { .. } => ErrorKind::InvalidImplementation,
            DiError::UndefinedLifetime { .. } | DiError::UndefinedLifetimeName { .. } => {
                ErrorKind::UndefinedLifetime
            }
            DiError::UnsharableType { .. } => ErrorKind::UnsharableType,
            DiError::NoDefaultFactory { .. } => ErrorKind::NoDefaultFactory,
            DiError::NilFactory => ErrorKind::NilFactory,
            DiError::UnknownType { .. } => ErrorKind::UnknownType,
            DiError::ScopedValueRequestedFromRootProvider { .. } => {
                ErrorKind::ScopedValueRequestedFromRootProvider
            }
            DiError::NilResolver => ErrorKind::NilResolver,
            DiError::Resolver(_) => ErrorKind::ResolverError,
            DiError::InvalidResolution { .. } => ErrorKind::InvalidResolution,
            DiError::Factory(_) => ErrorKind::Factory,
        }
    }

    /// Reports whether this error, or any resolver error it wraps, is of `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        if self.kind() == kind {
            return true;
        }
        match self {
            DiError::Resolver(inner) => inner.is(kind),
            DiError::Factory(err) => err
                .downcast_ref::<DiError>()
                .is_some_and(|inner| inner.is(kind)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reflect;
    use std::error::Error as _;

    #[test]
    fn test_wrapped_resolver_error_matches_inner_kind() {
        let inner = DiError::UnknownType {
            type_info: String::type_info(),
        };
        let err = DiError::resolver(inner);

        assert_eq!(err.kind(), ErrorKind::ResolverError);
        assert!(err.is(ErrorKind::ResolverError));
        assert!(err.is(ErrorKind::UnknownType));
        assert!(!err.is(ErrorKind::NilResolver));

        let source = err.source().expect("wrapped error should be the source");
        assert!(source.to_string().contains("is unknown to the provider"));
    }

    #[test]
    fn test_factory_error_is_transparent() {
        let err = DiError::from(anyhow::anyhow!("database offline"));
        assert_eq!(err.kind(), ErrorKind::Factory);
        assert_eq!(err.to_string(), "database offline");
    }

    #[test]
    fn test_factory_error_carrying_di_error_matches_inner_kind() {
        let err = DiError::from(anyhow::Error::new(DiError::NilFactory));
        assert!(err.is(ErrorKind::Factory));
        assert!(err.is(ErrorKind::NilFactory));
    }

    #[test]
    fn test_messages_name_the_offending_types() {
        let err = DiError::UnsharableType {
            type_info: Vec::<i32>::type_info(),
            lifetime: Lifetime::SCOPED,
        };
        let message = err.to_string();
        assert!(message.contains("Vec<i32>"));
        assert!(message.contains("Scoped"));

        let err = DiError::UndefinedLifetime { value: 13 };
        assert_eq!(err.to_string(), "undefined lifetime: 13");
    }
}
