//! Host window message handling.

pub mod dispatcher;

pub use dispatcher::{host_proc, wake_loop, HEARTBEAT_MS, TIMER_HEARTBEAT, WM_WAKE};
