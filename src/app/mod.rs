//! Application-wide shared state.
//!
//! The visibility state machine lives here; it is owned by the dispatcher
//! and exposed read-only to other threads through [`VisibilityHandle`].

pub mod visibility;

pub use visibility::{VisibilityController, VisibilityHandle, VisibilityState};
