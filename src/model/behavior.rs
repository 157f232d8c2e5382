//! Behaviour flags and the combined settings snapshot.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::appearance::AppearanceConfig;
use super::constants::*;

/// Which tray icon gesture toggles the crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrayActivation {
    SingleClick,
    #[default]
    DoubleClick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Start Visible instead of Hidden.
    pub activate_on_start: bool,
    /// Toggle combination, e.g. `"Ctrl+Alt+C"`.
    pub toggle_hotkey: String,
    pub sample_interval_ms: u64,
    pub tray_activation: TrayActivation,
    pub show_notifications: bool,
    pub debug_logging: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            activate_on_start: false,
            toggle_hotkey: DEFAULT_HOTKEY.to_string(),
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            tray_activation: TrayActivation::DoubleClick,
            show_notifications: true,
            debug_logging: false,
        }
    }
}

impl BehaviorConfig {
    pub fn sanitized(mut self) -> Self {
        self.sample_interval_ms = self
            .sample_interval_ms
            .clamp(MIN_SAMPLE_INTERVAL_MS, MAX_SAMPLE_INTERVAL_MS);
        if self.toggle_hotkey.trim().is_empty() {
            self.toggle_hotkey = DEFAULT_HOTKEY.to_string();
        }
        self
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

/// Everything the Settings collaborator hands to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub appearance: AppearanceConfig,
    pub behavior: BehaviorConfig,
}

impl Settings {
    pub fn sanitized(self) -> Self {
        Self {
            appearance: self.appearance.sanitized(),
            behavior: self.behavior.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hotkey() {
        assert_eq!(BehaviorConfig::default().toggle_hotkey, "Ctrl+Alt+C");
    }

    #[test]
    fn test_sample_interval_clamped() {
        let b = BehaviorConfig {
            sample_interval_ms: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(b.sample_interval_ms, MIN_SAMPLE_INTERVAL_MS);

        let b = BehaviorConfig {
            sample_interval_ms: 10_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(b.sample_interval(), Duration::from_millis(MAX_SAMPLE_INTERVAL_MS));
    }

    #[test]
    fn test_blank_hotkey_restored() {
        let b = BehaviorConfig {
            toggle_hotkey: "   ".into(),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(b.toggle_hotkey, DEFAULT_HOTKEY);
    }

    #[test]
    fn test_settings_partial_json() {
        let s: Settings =
            serde_json::from_str(r#"{"behavior":{"activate_on_start":true}}"#).unwrap();
        assert!(s.behavior.activate_on_start);
        assert_eq!(s.behavior.tray_activation, TrayActivation::DoubleClick);
        assert_eq!(s.appearance, AppearanceConfig::default());
    }
}
