//! Windows runtime state.
//!
//! The engine lives in a thread-local on the UI thread. Window procedures
//! reach it through [`with_engine`], which refuses re-entrant access (a modal
//! dialog pumping messages while the engine is borrowed) instead of
//! panicking.

use std::cell::RefCell;
use std::sync::atomic::{AtomicIsize, Ordering};

use tracing::trace;
use windows::Win32::Foundation::HWND;

use crate::handlers::Engine;
use crate::storage::SettingsStore;

/// Host window handle as an integer so other threads can post wake-ups.
static HOST_HWND: AtomicIsize = AtomicIsize::new(0);

thread_local! {
    pub static ENGINE: RefCell<Option<Engine>> = const { RefCell::new(None) };
    pub static STORE: RefCell<Option<SettingsStore>> = const { RefCell::new(None) };
}

pub fn set_host_hwnd(hwnd: Option<HWND>) {
    let raw = hwnd.map_or(0, |h| h.0 as isize);
    HOST_HWND.store(raw, Ordering::Release);
}

pub fn host_hwnd() -> Option<HWND> {
    match HOST_HWND.load(Ordering::Acquire) {
        0 => None,
        raw => Some(HWND(raw as *mut _)),
    }
}

/// Run `f` against the engine. `None` if not installed or already borrowed.
pub fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
    ENGINE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            trace!("engine busy; deferring");
            None
        }
    })
}
