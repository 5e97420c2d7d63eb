use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::storage::{KeyValueStore, SETTINGS_KEY};
use crate::hotkey::Hotkey;

/// What happens to the launcher window after an app is opened
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LaunchBehavior {
    #[default]
    CloseAfterLaunch,
    StayOpen,
}

/// User preferences for the launcher
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LauncherSettings {
    /// Icon edge length in points
    pub icon_size: f64,
    /// Spacing between grid cells in points
    pub grid_spacing: f64,
    /// Group apps by category
    pub show_categories: bool,
    /// Background dimming, 0.0-1.0
    pub background_opacity: f64,
    pub hotkey: Hotkey,
    pub launch_behavior: LaunchBehavior,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            icon_size: 64.0,
            grid_spacing: 25.0,
            show_categories: true,
            background_opacity: 0.6,
            hotkey: Hotkey::default(),
            launch_behavior: LaunchBehavior::default(),
        }
    }
}

impl LauncherSettings {
    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.read(SETTINGS_KEY) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable launcher settings: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Failed to read launcher settings: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self).context("failed to serialize settings")?;
        store.write(SETTINGS_KEY, &bytes)
    }

    /// Human-readable hotkey, e.g. `⌘⌥F1`
    pub fn hotkey_description(&self) -> String {
        self.hotkey.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryStore;
    use crate::hotkey::{CONTROL_KEY, SHIFT_KEY};

    #[test]
    fn test_defaults_when_absent() {
        let settings = LauncherSettings::load(&MemoryStore::new());
        assert_eq!(settings, LauncherSettings::default());
        assert_eq!(settings.hotkey_description(), "⌘⌥F1");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store.insert(SETTINGS_KEY, br#"{"icon_size": 96.0, "launch_behavior": "stay_open"}"#);

        let settings = LauncherSettings::load(&store);
        assert_eq!(settings.icon_size, 96.0);
        assert_eq!(settings.launch_behavior, LaunchBehavior::StayOpen);
        assert_eq!(settings.grid_spacing, 25.0);
        assert!(settings.show_categories);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.insert(SETTINGS_KEY, b"][");
        assert_eq!(LauncherSettings::load(&store), LauncherSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = MemoryStore::new();
        let settings = LauncherSettings {
            hotkey: Hotkey::new(0x31, CONTROL_KEY | SHIFT_KEY),
            ..Default::default()
        };
        settings.save(&mut store).unwrap();

        let reloaded = LauncherSettings::load(&store);
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.hotkey_description(), "⌃⇧Space");
    }
}
