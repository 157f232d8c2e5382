//! Controller object: pump target, menu actions and the bus waker.

pub mod dispatcher;

pub use dispatcher::{create_controller, start_heartbeat, wake_loop};
