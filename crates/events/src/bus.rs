//! Publish/subscribe seam between the engine and whatever displays its results.
//!
//! The bus fans applied events out to consumers outside the engine (the "expiring
//! soon" banner, the activity feed). It is not a source of truth: the household
//! store already holds the mutated records by the time anything is published, so a
//! missed message only makes a view stale.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Predicate deciding which messages a subscriber wants to see.
pub type MessageFilter<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

/// Receiving end of a bus subscription.
///
/// Only messages published after the subscription was opened, and accepted by its
/// filter, arrive here.
#[derive(Debug)]
pub struct Subscription<M> {
    inbox: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(inbox: Receiver<M>) -> Self {
        Self { inbox }
    }

    /// Next queued message, if one is already waiting.
    pub fn poll(&self) -> Option<M> {
        self.inbox.try_recv().ok()
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// `None` on timeout or once the bus itself is gone.
    pub fn next_within(&self, timeout: Duration) -> Option<M> {
        match self.inbox.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<M> {
        self.inbox.try_iter().collect()
    }
}

/// Event bus used by the orchestration layer.
///
/// A failed `publish` never undoes anything; callers log it and move on.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    /// Subscribe to the messages accepted by `filter`.
    fn subscribe_filtered(&self, filter: MessageFilter<M>) -> Subscription<M>;

    /// Subscribe to every message.
    fn subscribe(&self) -> Subscription<M>
    where
        M: 'static,
    {
        self.subscribe_filtered(Arc::new(|_: &M| true))
    }
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe_filtered(&self, filter: MessageFilter<M>) -> Subscription<M> {
        (**self).subscribe_filtered(filter)
    }
}
