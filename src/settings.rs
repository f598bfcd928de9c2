//! Player settings and preferences
//!
//! Persisted separately from progress, as one JSON entry.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_CAP, MAX_TILES};
use crate::persistence::{KeyValueStore, read_key, write_key};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum background bricks for this preset
    pub fn max_tiles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => MAX_TILES,
            QualityPreset::High => 1200,
        }
    }
}

/// A change requested from the HUD controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Quality(QualityPreset),
    ToggleMotion,
}

impl SettingsChange {
    /// Decode a control's `data-action` / `data-value` pair
    pub fn parse(action: &str, value: Option<&str>) -> Option<Self> {
        match action {
            "quality" => value
                .and_then(QualityPreset::from_str)
                .map(SettingsChange::Quality),
            "motion" => Some(SettingsChange::ToggleMotion),
            _ => None,
        }
    }
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background quality preset
    pub quality: QualityPreset,
    /// Background frame rate cap
    pub frame_cap: u32,
    /// Ring + dot cursor (ignored on touch devices)
    pub custom_cursor: bool,
    /// Keep bricks still (hover recolor and clicks still work)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            frame_cap: FRAME_CAP,
            custom_cursor: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "brick_survey_settings";

    /// Effective tile cap
    pub fn max_tiles(&self) -> usize {
        self.quality.max_tiles()
    }

    /// Frame cap, never below 1 fps
    pub fn effective_frame_cap(&self) -> u32 {
        self.frame_cap.max(1)
    }

    /// Whether to show the custom cursor on this device
    pub fn effective_custom_cursor(&self, touch_device: bool) -> bool {
        self.custom_cursor && !touch_device
    }

    /// Apply a change; false if nothing actually changed
    pub fn apply(&mut self, change: SettingsChange) -> bool {
        match change {
            SettingsChange::Quality(preset) if preset != self.quality => {
                self.quality = preset;
                true
            }
            SettingsChange::Quality(_) => false,
            SettingsChange::ToggleMotion => {
                self.reduced_motion = !self.reduced_motion;
                true
            }
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = read_key(store, Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (best-effort)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if write_key(store, Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("High"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_default_tile_cap() {
        assert_eq!(Settings::default().max_tiles(), 700);
        let low = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        assert_eq!(low.max_tiles(), 300);
    }

    #[test]
    fn test_round_trip_and_fallback() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            reduced_motion: true,
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);

        store.set_item(Settings::STORAGE_KEY, "nope").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_hud_controls_change_and_persist() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        let change = SettingsChange::parse("quality", Some("low")).unwrap();
        assert!(settings.apply(change));
        assert!(!settings.apply(change));
        assert!(settings.apply(SettingsChange::parse("motion", None).unwrap()));
        settings.save(&mut store);

        let reloaded = Settings::load(&store);
        assert_eq!(reloaded.max_tiles(), 300);
        assert!(reloaded.reduced_motion);

        assert_eq!(SettingsChange::parse("quality", Some("ultra")), None);
        assert_eq!(SettingsChange::parse("quality", None), None);
        assert_eq!(SettingsChange::parse("start", None), None);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store
            .set_item(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.frame_cap, 40);
        assert!(settings.custom_cursor);
    }

    #[test]
    fn test_cursor_hidden_on_touch() {
        let settings = Settings::default();
        assert!(settings.effective_custom_cursor(false));
        assert!(!settings.effective_custom_cursor(true));
    }
}
