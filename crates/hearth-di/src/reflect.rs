//! The [`Reflect`] trait and its implementations for standard types

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use crate::{
    Channel, CloseHandle, DiError, DiResult, ErrorKind, Factory, Kind, TypeInfo, Upcast,
};

/// Runtime description of a type, and how to build one without a custom
/// factory.
///
/// Implemented here for scalars, strings, arrays, `Vec`, maps, [`Channel`],
/// `()`, function and raw pointers, and [`Arc`]. User structs implement it
/// with [`reflect_struct!`](crate::reflect_struct) and trait objects with
/// [`reflect_interface!`](crate::reflect_interface).
///
/// Methods concerning `Arc<Self>` live on the pointee so that they can be
/// provided for local types without running into coherence rules.
pub trait Reflect: 'static {
    fn type_info() -> TypeInfo;

    /// How to construct a value when no factory was registered.
    fn default_factory() -> DiResult<Factory<Self>>
    where
        Self: Sized,
    {
        Err(DiError::NoDefaultFactory {
            type_info: Self::type_info(),
        })
    }

    fn shared_type_info() -> TypeInfo {
        TypeInfo::pointer::<Arc<Self>>(Self::type_info)
    }

    /// The default factory of `Arc<Self>`. Types with a default factory
    /// should return [`pointer_factory`] here.
    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        Err(DiError::NoDefaultFactory {
            type_info: Self::shared_type_info(),
        })
    }

    /// Conversions of a value into the interface types it implements.
    fn upcasts() -> Vec<Upcast<Self>>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Conversions of `Arc<Self>` into `Arc<dyn Trait>` handles.
    fn interfaces() -> Vec<Upcast<Arc<Self>>> {
        Vec::new()
    }

    fn close_handle(&self) -> Option<CloseHandle> {
        None
    }

    fn shared_close_handle(this: &Arc<Self>) -> Option<CloseHandle> {
        let _ = this;
        None
    }
}

/// The default factory for `T`, or [`DiError::NoDefaultFactory`].
pub fn default_factory<T: Reflect>() -> DiResult<Factory<T>> {
    T::default_factory()
}

/// Builds `Arc<T>` by constructing `T` with its default factory and placing it
/// behind a fresh pointer. When `T` has no default factory the error names
/// `Arc<T>`.
pub fn pointer_factory<T: Reflect>() -> DiResult<Factory<Arc<T>>> {
    match T::default_factory() {
        Ok(factory) => Ok(factory.map(Arc::new)),
        Err(err) if err.kind() == ErrorKind::NoDefaultFactory => Err(DiError::NoDefaultFactory {
            type_info: T::shared_type_info(),
        }),
        Err(err) => Err(err),
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn type_info() -> TypeInfo {
        T::shared_type_info()
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        T::shared_default_factory()
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }

    fn upcasts() -> Vec<Upcast<Self>> {
        T::interfaces()
    }

    fn close_handle(&self) -> Option<CloseHandle> {
        T::shared_close_handle(self)
    }
}

macro_rules! reflect_zero_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::of::<$ty>(Kind::$kind)
                }

                fn default_factory() -> DiResult<Factory<Self>> {
                    Ok(Factory::new(|_| Ok(<$ty>::default())))
                }

                fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
                    pointer_factory::<Self>()
                }
            }
        )*
    };
}

reflect_zero_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    i128 => Int,
    isize => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    u128 => Uint,
    f32 => Float,
    f64 => Float,
    char => Char,
    String => String,
}

// Address-sized integers have no meaningful zero value to inject.
impl Reflect for usize {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<usize>(Kind::Uintptr)
    }
}

impl Reflect for () {
    fn type_info() -> TypeInfo {
        TypeInfo::structure::<()>(Vec::new())
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(())))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<T: Reflect + Default, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Array).with_elem(T::type_info)
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(std::array::from_fn(|_| T::default()))))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Slice).with_elem(T::type_info)
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(Vec::new())))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<K: Reflect + Eq + Hash, V: Reflect> Reflect for HashMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Map).with_elem(V::type_info)
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(HashMap::new())))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Map).with_elem(V::type_info)
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(BTreeMap::new())))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<T: Reflect + Send> Reflect for Channel<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Chan).with_elem(T::type_info)
    }

    fn default_factory() -> DiResult<Factory<Self>> {
        Ok(Factory::new(|_| Ok(Channel::new())))
    }

    fn shared_default_factory() -> DiResult<Factory<Arc<Self>>> {
        pointer_factory::<Self>()
    }
}

impl<R: Reflect> Reflect for fn() -> R {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Func)
    }
}

impl<A: Reflect, R: Reflect> Reflect for fn(A) -> R {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::Func)
    }
}

impl<T: Reflect + ?Sized> Reflect for *const T {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::UnsafePointer).with_elem(T::type_info)
    }
}

impl<T: Reflect + ?Sized> Reflect for *mut T {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Kind::UnsafePointer).with_elem(T::type_info)
    }
}
