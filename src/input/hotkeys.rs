//! System-wide toggle hotkey.
//!
//! - [`KeyBinding`]: parsed, normalised combination such as `Ctrl+Alt+C`
//! - [`HotkeyRegistrar`]: OS registration seam (real one: [`GlobalHotKeyRegistrar`])
//! - [`GlobalHotkeyListener`]: owns the single active binding and debounces
//!   its events
//!
//! Registration goes through the `global-hotkey` crate on every platform;
//! its events arrive on the crate's own thread and are forwarded to the
//! event bus as [`AppEvent::Hotkey`].

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use crate::error::{CoreError, FeatureFault};
use crate::events::{AppEvent, EventPublisher, KeyState};

// === Binding ===

/// A validated key combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    hotkey: HotKey,
    text: String,
}

impl KeyBinding {
    pub fn hotkey(&self) -> HotKey {
        self.hotkey
    }

    /// Id reported by the OS backend for this combination.
    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }

    /// Normalised text, e.g. `Ctrl+Alt+C`.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

const LETTERS: [Code; 26] = [
    Code::KeyA, Code::KeyB, Code::KeyC, Code::KeyD, Code::KeyE, Code::KeyF, Code::KeyG,
    Code::KeyH, Code::KeyI, Code::KeyJ, Code::KeyK, Code::KeyL, Code::KeyM, Code::KeyN,
    Code::KeyO, Code::KeyP, Code::KeyQ, Code::KeyR, Code::KeyS, Code::KeyT, Code::KeyU,
    Code::KeyV, Code::KeyW, Code::KeyX, Code::KeyY, Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0, Code::Digit1, Code::Digit2, Code::Digit3, Code::Digit4,
    Code::Digit5, Code::Digit6, Code::Digit7, Code::Digit8, Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1, Code::F2, Code::F3, Code::F4, Code::F5, Code::F6,
    Code::F7, Code::F8, Code::F9, Code::F10, Code::F11, Code::F12,
];

/// Maps one key token to its code and display name.
fn parse_key(token: &str) -> Option<(Code, String)> {
    let upper = token.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    if bytes.len() == 1 {
        let c = bytes[0];
        if c.is_ascii_uppercase() {
            return Some((LETTERS[(c - b'A') as usize], upper));
        }
        if c.is_ascii_digit() {
            return Some((DIGITS[(c - b'0') as usize], upper));
        }
    }
    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        if (1..=FUNCTION_KEYS.len()).contains(&n) {
            return Some((FUNCTION_KEYS[n - 1], format!("F{}", n)));
        }
    }
    let (code, name) = match upper.as_str() {
        "SPACE" => (Code::Space, "Space"),
        "TAB" => (Code::Tab, "Tab"),
        "ENTER" | "RETURN" => (Code::Enter, "Enter"),
        "ESC" | "ESCAPE" => (Code::Escape, "Esc"),
        "BACKSPACE" => (Code::Backspace, "Backspace"),
        "DEL" | "DELETE" => (Code::Delete, "Delete"),
        "INS" | "INSERT" => (Code::Insert, "Insert"),
        "HOME" => (Code::Home, "Home"),
        "END" => (Code::End, "End"),
        "PGUP" | "PAGEUP" => (Code::PageUp, "PageUp"),
        "PGDN" | "PAGEDOWN" => (Code::PageDown, "PageDown"),
        "UP" => (Code::ArrowUp, "Up"),
        "DOWN" => (Code::ArrowDown, "Down"),
        "LEFT" => (Code::ArrowLeft, "Left"),
        "RIGHT" => (Code::ArrowRight, "Right"),
        "-" | "MINUS" => (Code::Minus, "-"),
        "=" | "EQUAL" => (Code::Equal, "="),
        "," | "COMMA" => (Code::Comma, ","),
        "." | "PERIOD" => (Code::Period, "."),
        "/" | "SLASH" => (Code::Slash, "/"),
        ";" | "SEMICOLON" => (Code::Semicolon, ";"),
        "`" | "BACKQUOTE" => (Code::Backquote, "`"),
        _ => return None,
    };
    Some((code, name.to_string()))
}

fn is_function_key(code: Code) -> bool {
    FUNCTION_KEYS.contains(&code)
}

/// Parses `Ctrl+Alt+C` style text. Tokens are case-insensitive and may be
/// padded with spaces. At least one modifier is required unless the key is
/// a function key.
impl FromStr for KeyBinding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidBinding {
            binding: s.to_string(),
            reason: reason.to_string(),
        };

        let mut mods = Modifiers::empty();
        let mut key: Option<(Code, String)> = None;
        for raw in s.split('+') {
            let token = raw.trim();
            if token.is_empty() {
                return Err(invalid("empty key name"));
            }
            let modifier = match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Some(Modifiers::CONTROL),
                "alt" | "option" | "opt" => Some(Modifiers::ALT),
                "shift" => Some(Modifiers::SHIFT),
                "super" | "win" | "meta" | "cmd" | "command" => Some(Modifiers::SUPER),
                _ => None,
            };
            match modifier {
                Some(m) => mods |= m,
                None if key.is_some() => return Err(invalid("more than one non-modifier key")),
                None => {
                    key = Some(parse_key(token).ok_or_else(|| invalid("unknown key name"))?);
                }
            }
        }

        let (code, key_name) = key.ok_or_else(|| invalid("no key after the modifiers"))?;
        if mods.is_empty() && !is_function_key(code) {
            return Err(invalid("needs at least one modifier"));
        }

        let mut parts: Vec<&str> = Vec::new();
        if mods.contains(Modifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if mods.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if mods.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        if mods.contains(Modifiers::SUPER) {
            parts.push("Super");
        }
        parts.push(&key_name);
        let text = parts.join("+");

        let mods = (!mods.is_empty()).then_some(mods);
        Ok(Self {
            hotkey: HotKey::new(mods, code),
            text,
        })
    }
}

// === Registration ===

/// OS-level hotkey registration.
pub trait HotkeyRegistrar {
    /// Claim `binding` system-wide. Returns `BindingConflict` if taken.
    fn register(&mut self, binding: &KeyBinding) -> Result<(), CoreError>;

    /// Release `binding`. Failures are logged, never returned.
    fn unregister(&mut self, binding: &KeyBinding);
}

/// [`HotkeyRegistrar`] backed by `global-hotkey`.
///
/// Must be created on the thread that runs the platform event loop.
pub struct GlobalHotKeyRegistrar {
    manager: GlobalHotKeyManager,
}

impl GlobalHotKeyRegistrar {
    /// Creates the manager and forwards its events to `publisher`.
    pub fn new(publisher: EventPublisher) -> Result<Self, CoreError> {
        let manager = GlobalHotKeyManager::new().map_err(|e| {
            CoreError::PermissionDenied(format!("global hotkeys unavailable: {}", e))
        })?;
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            let state = match event.state {
                HotKeyState::Pressed => KeyState::Pressed,
                HotKeyState::Released => KeyState::Released,
            };
            publisher.publish(AppEvent::Hotkey {
                id: event.id,
                state,
                at: Instant::now(),
            });
        }));
        Ok(Self { manager })
    }
}

impl HotkeyRegistrar for GlobalHotKeyRegistrar {
    fn register(&mut self, binding: &KeyBinding) -> Result<(), CoreError> {
        self.manager.register(binding.hotkey()).map_err(|e| {
            debug!(binding = %binding, error = %e, "hotkey registration refused");
            CoreError::BindingConflict {
                binding: binding.to_string(),
            }
        })
    }

    fn unregister(&mut self, binding: &KeyBinding) {
        if let Err(e) = self.manager.unregister(binding.hotkey()) {
            debug!(binding = %binding, error = %e, "hotkey unregistration failed");
        }
    }
}

impl Drop for GlobalHotKeyRegistrar {
    fn drop(&mut self) {
        // No callbacks after teardown.
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
    }
}

/// Stands in for a hotkey service that failed to start.
///
/// Every registration fails with the startup error, so the engine disables
/// the feature through its normal fault path instead of the process exiting.
pub struct UnavailableRegistrar {
    reason: String,
}

impl UnavailableRegistrar {
    pub fn from_error(err: &CoreError) -> Self {
        let reason = match err {
            CoreError::PermissionDenied(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self { reason }
    }

    pub fn fault(&self) -> FeatureFault {
        FeatureFault::PermissionDenied(self.reason.clone())
    }
}

impl HotkeyRegistrar for UnavailableRegistrar {
    fn register(&mut self, _binding: &KeyBinding) -> Result<(), CoreError> {
        Err(CoreError::PermissionDenied(self.reason.clone()))
    }

    fn unregister(&mut self, _binding: &KeyBinding) {}
}

// === Listener ===

/// Holds at most one registered binding and filters its events.
pub struct GlobalHotkeyListener {
    registrar: Box<dyn HotkeyRegistrar>,
    active: Option<KeyBinding>,
    debouncer: Debouncer,
}

impl GlobalHotkeyListener {
    pub fn new(registrar: Box<dyn HotkeyRegistrar>) -> Self {
        Self {
            registrar,
            active: None,
            debouncer: Debouncer::default(),
        }
    }

    pub fn active(&self) -> Option<&KeyBinding> {
        self.active.as_ref()
    }

    /// Replace the active binding.
    ///
    /// The new combination is registered before the old one is released;
    /// if registration fails the old binding stays active and the error
    /// (normally `BindingConflict`) is returned.
    pub fn bind(&mut self, binding: KeyBinding) -> Result<(), CoreError> {
        if self.active.as_ref() == Some(&binding) {
            return Ok(());
        }
        if let Err(e) = self.registrar.register(&binding) {
            warn!(binding = %binding, kept = ?self.active.as_ref().map(|b| b.as_str()), error = %e, "hotkey registration failed");
            return Err(e);
        }
        if let Some(old) = self.active.replace(binding) {
            self.registrar.unregister(&old);
        }
        self.debouncer.reset();
        if let Some(b) = &self.active {
            info!(binding = %b, "toggle hotkey registered");
        }
        Ok(())
    }

    /// Release the active binding. Safe to call at any time; afterwards
    /// [`accept`](Self::accept) rejects every event.
    pub fn unbind(&mut self) {
        if let Some(old) = self.active.take() {
            self.registrar.unregister(&old);
            debug!(binding = %old, "toggle hotkey released");
        }
    }

    /// Returns true if this event should toggle visibility.
    pub fn accept(&mut self, id: u32, state: KeyState, now: Instant) -> bool {
        match &self.active {
            Some(b) if b.id() == id => self.debouncer.accept(state, now),
            _ => false,
        }
    }
}

impl Drop for GlobalHotkeyListener {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_binding() {
        let b: KeyBinding = "Ctrl+Alt+C".parse().unwrap();
        assert_eq!(b.as_str(), "Ctrl+Alt+C");
        assert_eq!(
            b.hotkey(),
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyC)
        );
    }

    #[test]
    fn test_parse_normalises_case_order_and_spaces() {
        let b: KeyBinding = " alt + control + x ".parse().unwrap();
        assert_eq!(b.as_str(), "Ctrl+Alt+X");
    }

    #[test]
    fn test_parse_aliases() {
        let b: KeyBinding = "Cmd+Shift+F5".parse().unwrap();
        assert_eq!(b.as_str(), "Shift+Super+F5");
    }

    #[test]
    fn test_function_key_alone_allowed() {
        assert!("F9".parse::<KeyBinding>().is_ok());
    }

    #[test]
    fn test_plain_letter_rejected() {
        assert!(matches!(
            "C".parse::<KeyBinding>(),
            Err(CoreError::InvalidBinding { .. })
        ));
    }

    #[test]
    fn test_two_keys_rejected() {
        assert!("Ctrl+A+B".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!("Ctrl+Banana".parse::<KeyBinding>().is_err());
        assert!("Ctrl+".parse::<KeyBinding>().is_err());
        assert!("Ctrl+Alt".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_same_text_same_id() {
        let a: KeyBinding = "ctrl+alt+c".parse().unwrap();
        let b: KeyBinding = "Alt+Ctrl+C".parse().unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }
}
