//! Scoped resolution contexts and their teardown

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    resolve, CloseHandle, DiResult, Instance, InstanceCache, Lifetime, Reflect, Resolver,
    RootProvider, TypeInfo,
};

/// Resolves scoped values, keeping one instance of each per scope, and
/// delegates transient and singleton values to its root provider.
///
/// Clones share the same scoped instances.
#[derive(Clone)]
pub struct Scope {
    root: RootProvider,
    scoped: Arc<InstanceCache>,
}

impl Scope {
    pub(crate) fn new(root: RootProvider) -> Self {
        debug!("Created scope");
        Self {
            root,
            scoped: Arc::new(InstanceCache::new()),
        }
    }

    /// Creates a child scope on the same root. It starts with an empty scoped
    /// cache and shares nothing scoped with this scope.
    pub fn new_scope(&self) -> Scope {
        self.root.new_scope()
    }

    pub fn root(&self) -> &RootProvider {
        &self.root
    }

    /// Resolves a `T`.
    pub fn get<T: Reflect + Clone>(&self) -> DiResult<T> {
        resolve::<T>(Some(self))
    }

    /// Closes every scoped instance that implements
    /// [`ContextCloser`](crate::ContextCloser) or [`Closer`](crate::Closer),
    /// concurrently.
    ///
    /// Returns the errors reported by closers once all of them finished, or
    /// the errors received so far as soon as `cancel` fires.
    pub async fn close(&self, cancel: CancellationToken) -> Vec<anyhow::Error> {
        let handles: Vec<CloseHandle> = self
            .scoped
            .values()
            .iter()
            .filter_map(|instance| instance.close_handle().cloned())
            .collect();

        let mut pending = handles.len();
        debug!(closers = pending, "Closing scope");

        let (tx, mut rx) = mpsc::unbounded_channel();
        for handle in handles {
            let tx = tx.clone();
            match handle {
                CloseHandle::Context(closer) => {
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(closer.close(cancel).await);
                    });
                }
                CloseHandle::Plain(closer) => {
                    tokio::task::spawn_blocking(move || {
                        let _ = tx.send(closer.close());
                    });
                }
            }
        }
        drop(tx);

        let mut errors = Vec::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    if pending > 0 {
                        warn!(pending, "Scope close cancelled before all closers finished");
                    }
                    return errors;
                }
                result = rx.recv() => match result {
                    Some(result) => {
                        pending -= 1;
                        if let Err(err) = result {
                            errors.push(err);
                        }
                    }
                    None => return errors,
                },
            }
        }
    }

    /// [`Scope::close`] with a token cancelled after `timeout`.
    pub async fn close_timeout(&self, timeout: Duration) -> Vec<anyhow::Error> {
        let cancel = CancellationToken::new();
        let timer = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        };
        let errors = self.close(cancel).await;
        timer.abort();
        errors
    }

    /// Closes the scope within the root provider's configured close timeout.
    pub async fn shutdown(&self) -> Vec<anyhow::Error> {
        self.close_timeout(self.root.config().close_timeout()).await
    }
}

impl Resolver for Scope {
    fn resolve(&self, type_info: &TypeInfo) -> DiResult<Instance> {
        match self.root.registration(type_info) {
            Some(registration) if registration.lifetime == Lifetime::SCOPED => {
                self.root.log_resolution(registration);
                self.scoped.resolve(type_info, &registration.factory, self)
            }
            _ => self.root.resolve(type_info),
        }
    }
}
