//! Teardown capabilities of resolved values

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A value that can be closed.
///
/// Closers run on tokio's blocking pool, so `close` may block.
pub trait Closer: Send + Sync {
    fn close(&self) -> anyhow::Result<()>;
}

/// A value that can be closed with a cancellation token.
///
/// When a value is both a [`Closer`] and a `ContextCloser`, only this method
/// is called.
#[async_trait]
pub trait ContextCloser: Send + Sync {
    async fn close(&self, cancel: CancellationToken) -> anyhow::Result<()>;
}

/// How a cached instance is closed when its scope is torn down
#[derive(Clone)]
pub enum CloseHandle {
    Context(Arc<dyn ContextCloser>),
    Plain(Arc<dyn Closer>),
}

impl fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseHandle::Context(_) => f.write_str("CloseHandle::Context"),
            CloseHandle::Plain(_) => f.write_str("CloseHandle::Plain"),
        }
    }
}
