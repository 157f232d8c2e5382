//! Global access to the application event publisher.
//!
//! OS callbacks that cannot capture state (window procedures, Objective-C
//! method implementations) publish through here. The bus itself is owned by
//! the [`crate::handlers::Engine`]; the platform layer installs one of its
//! publishers at startup via [`install_publisher`].
//!
//! # Example
//!
//! ```ignore
//! // In the platform run loop at startup:
//! events::install_publisher(engine.publisher());
//!
//! // In a window procedure:
//! events::publish(AppEvent::DisplaysChanged);
//! ```

use std::sync::OnceLock;

use tracing::warn;

use super::bus::EventPublisher;
use super::types::AppEvent;

/// Global publisher. `EventPublisher` is `Send + Sync`.
static PUBLISHER: OnceLock<EventPublisher> = OnceLock::new();

/// Install the process-wide publisher.
///
/// Returns false if one was already installed; the first one stays.
pub fn install_publisher(publisher: EventPublisher) -> bool {
    PUBLISHER.set(publisher).is_ok()
}

/// Get a clone of the global publisher, if installed.
pub fn publisher() -> Option<EventPublisher> {
    PUBLISHER.get().cloned()
}

/// Publish an event through the global publisher.
///
/// Events published before installation are dropped with a warning.
pub fn publish(event: AppEvent) {
    match PUBLISHER.get() {
        Some(publisher) => {
            publisher.publish(event);
        }
        None => warn!(event = event.description(), "event published before bus installation"),
    }
}
