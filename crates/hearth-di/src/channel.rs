//! Unbuffered channel values that can be shared through a provider

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvError, SendError, SyncSender, TryRecvError};
use std::sync::Arc;

use parking_lot::Mutex;

/// A rendezvous channel: every send blocks until a receiver takes the value.
///
/// Clones refer to the same channel, which makes `Channel` a sharable type
/// that can be registered with a scoped or singleton lifetime.
pub struct Channel<T> {
    sender: SyncSender<T>,
    receiver: Arc<Mutex<Receiver<T>>>,
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::sync_channel(0);
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.sender.send(value)
    }

    pub fn recv(&self) -> Result<T, RecvError> {
        self.receiver.lock().recv()
    }

    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.lock().try_recv()
    }

    /// Always zero: the channel holds no buffered values.
    pub fn capacity(&self) -> usize {
        0
    }

    /// Whether `self` and `other` are handles to the same channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.receiver, &other.receiver)
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: Arc::clone(&self.receiver),
        }
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &Arc::as_ptr(&self.receiver))
            .finish()
    }
}
