//! Registration validation tests

use std::collections::HashMap;
use std::sync::Arc;

use hearth_di::*;

pub trait Writer: Send + Sync {
    fn write(&self, text: &str);
}

pub trait Reader: Send + Sync {
    fn read(&self) -> String;
}

reflect_interface!(dyn Writer, dyn Reader);

reflect_struct! {
    #[derive(Default)]
    pub struct Buffer {
        contents: parking_lot::Mutex<String>,
    }
    implements [dyn Writer];
}

impl Writer for Buffer {
    fn write(&self, text: &str) {
        self.contents.lock().push_str(text);
    }
}

reflect_struct! {
    pub struct Plain {
        value: i32,
    }
}

reflect_struct! {
    pub struct WithCallback {
        pub callback: fn() -> i32,
    }
}

fn kind_of(result: DiResult<Registry>) -> ErrorKind {
    match result {
        Ok(_) => panic!("expected registration to fail"),
        Err(err) => err.kind(),
    }
}

#[test]
fn test_register_type_rejects_interface_implementation() {
    let err = Registry::new()
        .register_type::<Arc<dyn Writer>, Arc<dyn Writer>>(Lifetime::SINGLETON)
        .err()
        .unwrap();
    match err {
        DiError::NonConcreteImplementation { type_info } => {
            assert_eq!(type_info, Arc::<dyn Writer>::type_info())
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_register_type_rejects_unassignable_implementation() {
    let err = Registry::new()
        .register_type::<Arc<dyn Reader>, Arc<Buffer>>(Lifetime::SINGLETON)
        .err()
        .unwrap();
    match err {
        DiError::InvalidImplementation {
            implementation,
            target,
        } => {
            assert_eq!(implementation, Arc::<Buffer>::type_info());
            assert_eq!(target, Arc::<dyn Reader>::type_info());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(
        kind_of(Registry::new().register_type::<Arc<String>, Arc<Buffer>>(Lifetime::SINGLETON)),
        ErrorKind::InvalidImplementation
    );
}

#[test]
fn test_register_type_accepts_declared_interface() {
    let registry = Registry::new()
        .register_type::<Arc<dyn Writer>, Arc<Buffer>>(Lifetime::SINGLETON)
        .unwrap();
    assert!(registry.contains::<Arc<dyn Writer>>());
    assert!(!registry.contains::<Arc<Buffer>>());
}

#[test]
fn test_register_type_requires_default_factory() {
    let cases: Vec<(&str, DiResult<Registry>, TypeInfo)> = vec![
        (
            "uintptr",
            Registry::new().register_type::<usize, usize>(Lifetime::TRANSIENT),
            usize::type_info(),
        ),
        (
            "pointer to uintptr",
            Registry::new().register_type::<Arc<usize>, Arc<usize>>(Lifetime::TRANSIENT),
            Arc::<usize>::type_info(),
        ),
        (
            "func",
            Registry::new().register_type::<fn() -> i32, fn() -> i32>(Lifetime::TRANSIENT),
            <fn() -> i32>::type_info(),
        ),
        (
            "pointer to pointer to func",
            Registry::new()
                .register_type::<Arc<Arc<fn(u8) -> u8>>, Arc<Arc<fn(u8) -> u8>>>(Lifetime::SINGLETON),
            Arc::<Arc<fn(u8) -> u8>>::type_info(),
        ),
    ];

    for (name, result, expected) in cases {
        match result {
            Err(DiError::NoDefaultFactory { type_info }) => {
                assert_eq!(type_info, expected, "{name}")
            }
            Err(other) => panic!("{name}: unexpected error {other}"),
            Ok(_) => panic!("{name}: expected NoDefaultFactory"),
        }
    }
}

#[test]
fn test_register_type_default_factory_checked_before_lifetime() {
    assert_eq!(
        kind_of(Registry::new().register_type::<usize, usize>(Lifetime::from_raw(42))),
        ErrorKind::NoDefaultFactory
    );
}

#[test]
fn test_register_type_rejects_undefined_lifetime() {
    let err = Registry::new()
        .register_type::<Arc<i32>, Arc<i32>>(Lifetime::from_raw(4))
        .err()
        .unwrap();
    assert!(matches!(err, DiError::UndefinedLifetime { value: 4 }));
}

#[test]
fn test_unsharable_types_are_transient_only() {
    fn check<T: Reflect + Send + Sync>(name: &str) {
        for lifetime in [Lifetime::SCOPED, Lifetime::SINGLETON] {
            match Registry::new().register_type::<T, T>(lifetime) {
                Err(DiError::UnsharableType {
                    type_info,
                    lifetime: rejected,
                }) => {
                    assert_eq!(type_info, T::type_info(), "{name}");
                    assert_eq!(rejected, lifetime, "{name}");
                }
                Err(other) => panic!("{name}: unexpected error {other}"),
                Ok(_) => panic!("{name}: expected UnsharableType for {lifetime}"),
            }
        }
        assert!(
            Registry::new().register_type::<T, T>(Lifetime::TRANSIENT).is_ok(),
            "{name}"
        );
    }

    check::<bool>("bool");
    check::<i32>("int");
    check::<String>("string");
    check::<[u8; 4]>("array");
    check::<Vec<String>>("slice");
    check::<HashMap<String, i32>>("map");
    check::<Plain>("struct");
    check::<()>("empty struct");
}

#[test]
fn test_sharable_types_accept_every_lifetime() {
    fn check<T: Reflect + Send + Sync>() {
        for lifetime in [Lifetime::TRANSIENT, Lifetime::SCOPED, Lifetime::SINGLETON] {
            let registry = Registry::new().register_type::<T, T>(lifetime).unwrap();
            assert_eq!(registry.lifetime_of::<T>(), Some(lifetime));
        }
    }

    check::<Arc<Plain>>();
    check::<Arc<Vec<u8>>>();
    check::<Arc<Arc<String>>>();
    check::<Channel<i32>>();
}

#[test]
fn test_struct_with_func_field_still_has_default_factory() {
    // The field is only resolved when the struct is built.
    assert!(Registry::new()
        .register_type::<Arc<WithCallback>, Arc<WithCallback>>(Lifetime::SINGLETON)
        .is_ok());
}

#[test]
fn test_register_factory_validation_order() {
    let none = || None::<Factory<Arc<dyn Writer>>>;

    assert_eq!(
        kind_of(Registry::new().register_factory::<Arc<dyn Writer>, Arc<dyn Writer>>(
            Lifetime::SINGLETON,
            none()
        )),
        ErrorKind::NonConcreteImplementation
    );
    assert_eq!(
        kind_of(Registry::new().register_factory::<Arc<dyn Reader>, Arc<Buffer>>(
            Lifetime::from_raw(0),
            None::<Factory<Arc<Buffer>>>
        )),
        ErrorKind::InvalidImplementation
    );
    assert_eq!(
        kind_of(Registry::new().register_factory::<Vec<u8>, Vec<u8>>(
            Lifetime::from_raw(0),
            None::<Factory<Vec<u8>>>
        )),
        ErrorKind::UndefinedLifetime
    );
    assert_eq!(
        kind_of(Registry::new().register_factory::<Vec<u8>, Vec<u8>>(
            Lifetime::SCOPED,
            None::<Factory<Vec<u8>>>
        )),
        ErrorKind::UnsharableType
    );
    assert_eq!(
        kind_of(Registry::new().register_factory::<Vec<u8>, Vec<u8>>(
            Lifetime::TRANSIENT,
            None::<Factory<Vec<u8>>>
        )),
        ErrorKind::NilFactory
    );
}

#[test]
fn test_register_factory_does_not_need_default_factory() {
    let registry = Registry::new()
        .register_factory::<usize, usize>(Lifetime::TRANSIENT, Factory::new(|_| Ok(7usize)))
        .unwrap()
        .register_factory::<Arc<fn() -> i32>, Arc<fn() -> i32>>(
            Lifetime::SINGLETON,
            Factory::new(|_| {
                let f: fn() -> i32 = || 3;
                Ok(Arc::new(f))
            }),
        )
        .unwrap();

    let provider = registry.build_root_provider();
    assert_eq!(provider.get::<usize>().unwrap(), 7);
    let callback = provider.get::<Arc<fn() -> i32>>().unwrap();
    assert_eq!((*callback)(), 3);
}

#[test]
fn test_built_provider_is_unaffected_by_later_registrations() {
    let registry = Registry::new();
    let provider = registry.build_root_provider();
    let _registry = registry
        .register_type::<Arc<i32>, Arc<i32>>(Lifetime::SINGLETON)
        .unwrap();

    let err = provider.get::<Arc<i32>>().unwrap_err();
    assert!(err.is(ErrorKind::UnknownType));
}
