//! Macros implementing [`Reflect`](crate::Reflect) for user types

/// Implements [`Reflect`](crate::Reflect) for trait objects so that
/// `Arc<dyn Trait>` can be used as a registration target.
///
/// The trait must have `Send + Sync` as supertraits.
///
/// ```rust
/// use hearth_di::{reflect_interface, Kind, Reflect};
/// use std::sync::Arc;
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// reflect_interface!(dyn Clock);
///
/// assert_eq!(Arc::<dyn Clock>::type_info().kind(), Kind::Interface);
/// ```
#[macro_export]
macro_rules! reflect_interface {
    ($($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $iface {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::interface::<Self>()
                }

                fn shared_type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::interface::<::std::sync::Arc<Self>>()
                }
            }
        )+
    };
}

/// Declares a struct and implements [`Reflect`](crate::Reflect) for it.
///
/// The default factory fills every `pub` field by resolving its type from the
/// active resolver and leaves every other field at its `Default` value.
/// `implements` lists the trait objects `Arc<Self>` can be registered as and
/// `closes` the close capabilities of the type (`Closer`, `ContextCloser`).
///
/// ```rust
/// use hearth_di::{reflect_struct, Lifetime, Registry};
/// use std::sync::Arc;
///
/// reflect_struct! {
///     #[derive(Clone)]
///     pub struct Greeter {
///         pub name: Arc<String>,
///         greetings: u32,
///     }
/// }
///
/// let provider = Registry::new()
///     .register_type::<Arc<String>, Arc<String>>(Lifetime::SINGLETON)
///     .unwrap()
///     .register_type::<Arc<Greeter>, Arc<Greeter>>(Lifetime::SINGLETON)
///     .unwrap()
///     .build_root_provider();
///
/// let greeter = provider.get::<Arc<Greeter>>().unwrap();
/// let name = provider.get::<Arc<String>>().unwrap();
/// assert!(Arc::ptr_eq(&greeter.name, &name));
/// assert_eq!(greeter.greetings, 0);
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
        $(implements [$($iface:ty),* $(,)?];)?
        $(closes [$($closer:ident),* $(,)?];)?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($body)*
        }

        $crate::__reflect_struct_fields! {
            @munch $name
            [$($($iface),*)?]
            [$($($closer),*)?]
            []
            $($body)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_struct_fields {
    (@munch $name:ident $ifaces:tt $closers:tt [$($fields:tt)*]) => {
        $crate::__reflect_struct_impl! { $name $ifaces $closers [$($fields)*] }
    };
    (@munch $name:ident $ifaces:tt $closers:tt [$($fields:tt)*]
        $(#[$fmeta:meta])* pub ($($restriction:tt)*) $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::__reflect_struct_fields! {
            @munch $name $ifaces $closers [$($fields)* (private $field $fty)] $($($rest)*)?
        }
    };
    (@munch $name:ident $ifaces:tt $closers:tt [$($fields:tt)*]
        $(#[$fmeta:meta])* pub $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::__reflect_struct_fields! {
            @munch $name $ifaces $closers [$($fields)* (public $field $fty)] $($($rest)*)?
        }
    };
    (@munch $name:ident $ifaces:tt $closers:tt [$($fields:tt)*]
        $(#[$fmeta:meta])* $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::__reflect_struct_fields! {
            @munch $name $ifaces $closers [$($fields)* (private $field $fty)] $($($rest)*)?
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_struct_impl {
    ($name:ident [$($iface:ty),*] [$($closer:ident),*] [$(($access:ident $field:ident $fty:ty))*]) => {
        impl $crate::Reflect for $name {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::structure::<Self>(::std::vec![
                    $(
                        $crate::__reflect_field!(@info $access $field $fty),
                    )*
                ])
            }

            fn default_factory() -> $crate::DiResult<$crate::Factory<Self>> {
                ::std::result::Result::Ok($crate::Factory::new(
                    |resolver: &dyn $crate::Resolver| {
                        let _ = resolver;
                        ::std::result::Result::Ok($name {
                            $($field: $crate::__reflect_field!(@value $access $fty, resolver),)*
                        })
                    },
                ))
            }

            fn shared_default_factory(
            ) -> $crate::DiResult<$crate::Factory<::std::sync::Arc<Self>>> {
                $crate::pointer_factory::<Self>()
            }

            fn interfaces() -> ::std::vec::Vec<$crate::Upcast<::std::sync::Arc<Self>>> {
                ::std::vec![
                    $(
                        $crate::Upcast::new::<::std::sync::Arc<$iface>>(
                            |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<$iface> { this },
                        ),
                    )*
                ]
            }

            $crate::__reflect_close!([$($closer),*]);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_field {
    (@info public $field:ident $fty:ty) => {
        $crate::FieldInfo::public::<$fty>(::std::stringify!($field))
    };
    (@info private $field:ident $fty:ty) => {
        $crate::FieldInfo::private(::std::stringify!($field))
    };
    (@value public $fty:ty, $resolver:ident) => {
        $crate::resolve_from::<$fty>($resolver)?
    };
    (@value private $fty:ty, $resolver:ident) => {
        <$fty as ::std::default::Default>::default()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_close {
    ([]) => {};
    ([Closer]) => {
        $crate::__reflect_close!(@handle Plain);
    };
    ([ContextCloser]) => {
        $crate::__reflect_close!(@handle Context);
    };
    ([Closer, ContextCloser]) => {
        $crate::__reflect_close!(@handle Context);
    };
    ([ContextCloser, Closer]) => {
        $crate::__reflect_close!(@handle Context);
    };
    (@handle $variant:ident) => {
        fn shared_close_handle(
            this: &::std::sync::Arc<Self>,
        ) -> ::std::option::Option<$crate::CloseHandle> {
            ::std::option::Option::Some($crate::CloseHandle::$variant(
                ::std::sync::Arc::clone(this) as _,
            ))
        }
    };
}
