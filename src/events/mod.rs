//! Event system for decoupled inter-module communication.
//!
//! Every OS callback (sampling thread, hotkey thread, tray window procedure,
//! settings watcher) is marshalled onto the single coordinating loop through
//! an mpsc channel. Nothing outside the loop touches visibility, appearance
//! or the overlay surface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//! │   Tracker   │  │   Hotkeys   │  │    Tray     │  │  Settings   │
//! │  (thread)   │  │  (thread)   │  │  (wndproc)  │  │  watcher    │
//! └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘
//!        │ publish()      │ publish()      │ publish()      │ publish()
//!        ▼                ▼                ▼                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          EventBus                             │
//! │                 (mpsc channel + optional waker)               │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ drain()
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Engine (dispatcher)                       │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: Event definitions (`AppEvent` enum)
//! - [`bus`]: `EventBus`, `EventPublisher` and `Waker`
//! - [`global`]: Static publisher for callbacks that cannot capture state

pub mod bus;
pub mod global;
pub mod types;

// Re-export main types for convenient access
pub use bus::{EventBus, EventPublisher, Waker};
pub use global::{install_publisher, publish, publisher};
pub use types::{AppEvent, KeyState, ToggleSource, TrayAction, TrayGesture};
