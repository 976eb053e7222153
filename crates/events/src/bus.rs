//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus distributes change signals to any number of subscribers:
//!
//! - **Broadcast**: every live subscription receives every published message
//! - **No payload contract**: consumers treat a message as "re-query now"
//! - **No persistence**: a subscription only sees messages published after it
//!   was created
//! - **Scoped lifetime**: dropping a `Subscription` unregisters it
//!
//! Consumers may coalesce bursts of signals (e.g. drain with `try_recv` and
//! re-render once); the catalog snapshot, not the signal, is the source of
//! truth.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

/// A subscription to a signal stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let sub = service.subscribe();
///
/// loop {
///     match sub.recv_timeout(Duration::from_millis(250)) {
///         Ok(_changed) => render(service.catalog().await),
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
///
/// Subscriptions are meant for a single consumer. Messages arrive in publish
/// order for a single publisher.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Collect every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic publish/subscribe contract.
///
/// `publish()` may fail (e.g. lock poisoning); callers decide whether a failed
/// signal matters. The catalog service logs and continues, since the store
/// write that preceded the signal has already happened.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
