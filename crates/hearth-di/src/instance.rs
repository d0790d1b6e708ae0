//! Type-erased resolved values

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{CloseHandle, Reflect, TypeInfo};

/// A resolved value together with the descriptor of its implementation type
/// and, when the implementation can be closed, its close handle.
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_info: TypeInfo,
    close: Option<CloseHandle>,
}

impl Instance {
    pub fn new<T: Reflect + Send + Sync>(value: T) -> Self {
        let close = value.close_handle();
        Self {
            value: Arc::new(value),
            type_info: T::type_info(),
            close,
        }
    }

    /// Narrows the value to `T`, returning a copy of it.
    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn close_handle(&self) -> Option<&CloseHandle> {
        self.close.as_ref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info)
            .field("closeable", &self.close.is_some())
            .finish()
    }
}

/// Converts an implementation value into an instance of a target type.
pub struct Upcast<P> {
    target: TypeInfo,
    cast: Arc<dyn Fn(P) -> Arc<dyn Any + Send + Sync> + Send + Sync>,
}

impl<P: Reflect> Upcast<P> {
    pub fn new<T: Reflect + Send + Sync>(cast: fn(P) -> T) -> Self {
        Self {
            target: T::type_info(),
            cast: Arc::new(move |value: P| -> Arc<dyn Any + Send + Sync> {
                Arc::new(cast(value))
            }),
        }
    }

    pub fn identity() -> Self
    where
        P: Send + Sync,
    {
        Self::new::<P>(|value| value)
    }

    pub fn target(&self) -> &TypeInfo {
        &self.target
    }

    /// Converts `value`. The instance keeps the implementation's descriptor
    /// and close handle, not those of the target view of it.
    pub fn apply(&self, value: P) -> Instance {
        let close = value.close_handle();
        Instance {
            value: (self.cast)(value),
            type_info: P::type_info(),
            close,
        }
    }
}

impl<P> Clone for Upcast<P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            cast: Arc::clone(&self.cast),
        }
    }
}

impl<P> fmt::Debug for Upcast<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upcast").field("target", &self.target).finish()
    }
}
