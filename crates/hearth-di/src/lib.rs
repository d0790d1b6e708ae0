//! Dependency Injection Container
//!
//! A [`Registry`] maps target types to construction rules with a
//! [`Lifetime`]. It builds a [`RootProvider`], which resolves transient and
//! singleton values and creates [`Scope`]s, which additionally resolve scoped
//! values and close them when the unit of work ends.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hearth_di::{reflect_interface, reflect_struct, Lifetime, Registry};
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! reflect_interface!(dyn Greeter);
//!
//! reflect_struct! {
//!     pub struct English {
//!         pub name: Arc<String>,
//!     }
//!     implements [dyn Greeter];
//! }
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         format!("Hello, {}", self.name)
//!     }
//! }
//!
//! let provider = Registry::new()
//!     .register_factory::<Arc<String>, Arc<String>>(
//!         Lifetime::SINGLETON,
//!         hearth_di::Factory::new(|_| Ok(Arc::new(String::from("world")))),
//!     )
//!     .unwrap()
//!     .register_type::<Arc<dyn Greeter>, Arc<English>>(Lifetime::SCOPED)
//!     .unwrap()
//!     .build_root_provider();
//!
//! let scope = provider.new_scope();
//! let greeter = scope.get::<Arc<dyn Greeter>>().unwrap();
//! assert_eq!(greeter.greet(), "Hello, world");
//! ```

mod cache;
mod channel;
mod close;
mod config;
mod error;
mod factory;
mod instance;
mod lifetime;
mod macros;
mod reflect;
mod registry;
mod resolve;
mod root;
mod scope;
mod types;

pub use cache::InstanceCache;
pub use channel::Channel;
pub use close::{CloseHandle, Closer, ContextCloser};
pub use config::{ConfigError, ProviderConfig, CLOSE_TIMEOUT_ENV, LOG_RESOLUTIONS_ENV};
pub use error::{DiError, DiResult, ErrorKind};
pub use factory::{ErasedFactory, Factory};
pub use instance::{Instance, Upcast};
pub use lifetime::Lifetime;
pub use reflect::{default_factory, pointer_factory, Reflect};
pub use registry::Registry;
pub use resolve::{resolve, resolve_from, Resolver};
pub use root::RootProvider;
pub use scope::Scope;
pub use types::{FieldInfo, Kind, TypeInfo};

pub use tokio_util::sync::CancellationToken;
