//! Event handlers and dispatching.
//!
//! This module contains the engine that drains the event bus and drives
//! every component from the single coordinating loop.

pub mod dispatcher;

pub use dispatcher::{DisplaySource, Engine, HostRequest, PlatformParts, StatusEvent};
