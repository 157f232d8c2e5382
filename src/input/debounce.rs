//! Turns raw hotkey edges into one toggle per physical press.

use std::time::{Duration, Instant};

use crate::events::KeyState;
use crate::model::constants::HOTKEY_DEBOUNCE;

/// Presses further apart than this are never auto-repeat, even if the
/// backend never reported the release.
const REPEAT_GAP: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Debouncer {
    min_interval: Duration,
    held: bool,
    last_press_event: Option<Instant>,
    last_accepted: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(HOTKEY_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            held: false,
            last_press_event: None,
            last_accepted: None,
        }
    }

    /// Returns true if this edge is a new physical press.
    pub fn accept(&mut self, state: KeyState, now: Instant) -> bool {
        match state {
            KeyState::Released => {
                self.held = false;
                false
            }
            KeyState::Pressed => {
                let repeat = self.held
                    && self
                        .last_press_event
                        .is_some_and(|t| now.saturating_duration_since(t) < REPEAT_GAP);
                self.held = true;
                self.last_press_event = Some(now);
                if repeat {
                    return false;
                }
                if self
                    .last_accepted
                    .is_some_and(|t| now.saturating_duration_since(t) < self.min_interval)
                {
                    return false;
                }
                self.last_accepted = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.held = false;
        self.last_press_event = None;
        self.last_accepted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, n: u64) -> Instant {
        base + Duration::from_millis(n)
    }

    #[test]
    fn test_single_press_accepted() {
        let mut d = Debouncer::default();
        let t = Instant::now();
        assert!(d.accept(KeyState::Pressed, t));
        assert!(!d.accept(KeyState::Released, ms(t, 80)));
    }

    #[test]
    fn test_auto_repeat_suppressed() {
        let mut d = Debouncer::default();
        let t = Instant::now();
        assert!(d.accept(KeyState::Pressed, t));
        for i in 1..20 {
            assert!(!d.accept(KeyState::Pressed, ms(t, 200 + i * 33)));
        }
    }

    #[test]
    fn test_bounce_within_interval_suppressed() {
        let mut d = Debouncer::default();
        let t = Instant::now();
        assert!(d.accept(KeyState::Pressed, t));
        d.accept(KeyState::Released, ms(t, 20));
        assert!(!d.accept(KeyState::Pressed, ms(t, 60)));
    }

    #[test]
    fn test_second_press_after_release_accepted() {
        let mut d = Debouncer::default();
        let t = Instant::now();
        assert!(d.accept(KeyState::Pressed, t));
        d.accept(KeyState::Released, ms(t, 100));
        assert!(d.accept(KeyState::Pressed, ms(t, 400)));
    }

    #[test]
    fn test_missing_release_recovers_after_gap() {
        let mut d = Debouncer::default();
        let t = Instant::now();
        assert!(d.accept(KeyState::Pressed, t));
        assert!(d.accept(KeyState::Pressed, ms(t, 2000)));
    }
}
