//! Event queue between OS callbacks, worker threads and the dispatcher.
//!
//! Producers (cursor sampler, hotkey handler, tray window procedure,
//! settings watcher) hold an [`EventPublisher`]; the dispatcher drains the
//! [`EventBus`] once per batch and sees events in publish order.
//!
//! A [`Waker`] can be attached so publishes from background threads nudge
//! the platform run loop instead of waiting for its next timer tick. Wakes
//! are coalesced: at most one is outstanding until the loop drains.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use super::types::AppEvent;

/// Nudges the coordinating loop after a publish.
#[derive(Clone)]
pub struct Waker {
    pending: Arc<AtomicBool>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl Waker {
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(wake),
        }
    }

    fn notify(&self) {
        if !self.pending.swap(true, Ordering::AcqRel) {
            (self.wake)();
        }
    }

    fn rearm(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Waker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waker")
            .field("pending", &self.pending.load(Ordering::Relaxed))
            .finish()
    }
}

/// Receiving end of the application's event channel.
///
/// Owned by the dispatcher. Publishers may live on any thread.
///
/// # Example
///
/// ```
/// use mousecross::events::{AppEvent, EventBus};
///
/// let bus = EventBus::new();
/// let publisher = bus.publisher();
///
/// publisher.publish(AppEvent::DisplaysChanged);
///
/// let events = bus.drain();
/// assert_eq!(events.len(), 1);
/// ```
pub struct EventBus {
    sender: Sender<AppEvent>,
    receiver: Receiver<AppEvent>,
    waker: Option<Waker>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            waker: None,
        }
    }

    /// Create a bus whose publishers call `waker` after sending.
    pub fn with_waker(waker: Waker) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            waker: Some(waker),
        }
    }

    /// New producer handle sharing this bus's waker.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Try to receive the next event without blocking.
    pub fn try_recv(&self) -> Option<AppEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            // The bus holds a sender itself, so Disconnected cannot happen
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending events into a Vec, in publish order.
    ///
    /// Re-arms the waker first so a publish racing with the drain still
    /// produces a wake.
    pub fn drain(&self) -> Vec<AppEvent> {
        if let Some(waker) = &self.waker {
            waker.rearm();
        }
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half handed to producers.
#[derive(Clone, Debug)]
pub struct EventPublisher {
    sender: Sender<AppEvent>,
    waker: Option<Waker>,
}

impl EventPublisher {
    /// Publish an event to the bus.
    ///
    /// Returns false if the bus is gone (application shutting down).
    pub fn publish(&self, event: AppEvent) -> bool {
        if self.sender.send(event).is_err() {
            return false;
        }
        if let Some(waker) = &self.waker {
            waker.notify();
        }
        true
    }
}
