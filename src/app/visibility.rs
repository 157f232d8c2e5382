//! Visibility state machine.
//!
//! One serialized mutation point ([`VisibilityController::toggle`]) for
//! every toggle source. Side effects are not triggered per toggle: the
//! dispatcher calls [`VisibilityController::take_change`] once per drained
//! batch, so intermediate states that cancel out never reach the surface
//! or the tray.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    Hidden,
    Visible,
}

impl VisibilityState {
    pub fn flipped(self) -> Self {
        match self {
            VisibilityState::Hidden => VisibilityState::Visible,
            VisibilityState::Visible => VisibilityState::Hidden,
        }
    }

    pub fn is_visible(self) -> bool {
        self == VisibilityState::Visible
    }

    /// Initial state derived from the "activate on start" flag.
    pub fn initial(activate_on_start: bool) -> Self {
        if activate_on_start {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        }
    }
}

/// Read-only view of the current state for other threads.
#[derive(Debug, Clone)]
pub struct VisibilityHandle {
    visible: Arc<AtomicBool>,
}

impl VisibilityHandle {
    pub fn current(&self) -> VisibilityState {
        if self.visible.load(Ordering::Acquire) {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        }
    }
}

#[derive(Debug)]
pub struct VisibilityController {
    state: VisibilityState,
    /// Last state whose side effects were applied.
    committed: VisibilityState,
    mirror: Arc<AtomicBool>,
}

impl VisibilityController {
    /// Create a controller in `initial`, with that state already committed.
    pub fn new(initial: VisibilityState) -> Self {
        Self {
            state: initial,
            committed: initial,
            mirror: Arc::new(AtomicBool::new(initial.is_visible())),
        }
    }

    pub fn current(&self) -> VisibilityState {
        self.state
    }

    /// Last state the surface and tray were told about.
    pub fn committed(&self) -> VisibilityState {
        self.committed
    }

    /// Flip the state unconditionally. Returns the new state.
    pub fn toggle(&mut self) -> VisibilityState {
        self.set(self.state.flipped())
    }

    /// Force a state. Used when the feature is disabled.
    pub fn force(&mut self, state: VisibilityState) -> VisibilityState {
        self.set(state)
    }

    fn set(&mut self, state: VisibilityState) -> VisibilityState {
        self.state = state;
        self.mirror.store(state.is_visible(), Ordering::Release);
        state
    }

    /// Returns the new state if it differs from the committed one, and
    /// marks it committed.
    pub fn take_change(&mut self) -> Option<VisibilityState> {
        if self.state == self.committed {
            return None;
        }
        self.committed = self.state;
        Some(self.state)
    }

    pub fn handle(&self) -> VisibilityHandle {
        VisibilityHandle {
            visible: self.mirror.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_from_flag() {
        assert_eq!(VisibilityState::initial(true), VisibilityState::Visible);
        assert_eq!(VisibilityState::initial(false), VisibilityState::Hidden);
    }

    #[test]
    fn test_toggle_flips() {
        let mut c = VisibilityController::new(VisibilityState::Hidden);
        assert_eq!(c.toggle(), VisibilityState::Visible);
        assert_eq!(c.toggle(), VisibilityState::Hidden);
    }

    #[test]
    fn test_take_change_only_on_net_change() {
        let mut c = VisibilityController::new(VisibilityState::Hidden);
        c.toggle();
        c.toggle();
        assert_eq!(c.take_change(), None);

        c.toggle();
        assert_eq!(c.take_change(), Some(VisibilityState::Visible));
        assert_eq!(c.take_change(), None);
        assert_eq!(c.committed(), VisibilityState::Visible);
    }

    #[test]
    fn test_handle_tracks_state() {
        let mut c = VisibilityController::new(VisibilityState::Hidden);
        let h = c.handle();
        c.toggle();
        assert_eq!(h.current(), VisibilityState::Visible);
        c.force(VisibilityState::Hidden);
        assert_eq!(h.current(), VisibilityState::Hidden);
    }

    #[test]
    fn test_parity() {
        for initial in [VisibilityState::Hidden, VisibilityState::Visible] {
            for n in 0..9usize {
                let mut c = VisibilityController::new(initial);
                for _ in 0..n {
                    c.toggle();
                }
                let expect_visible = (n + initial.is_visible() as usize) % 2 == 1;
                assert_eq!(c.current().is_visible(), expect_visible);
            }
        }
    }
}
