//! Layout and data-source configuration.
//!
//! Settings are persisted to localStorage on WASM so they survive page reloads.
//! Native builds always start from the defaults.

use crate::store::PanelId;
use serde::{Deserialize, Serialize};

/// Fixed geometry shared by the sidebar, the content panels and the spinner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width (px) at and above which the sidebar docks by default.
    pub controls_hidden_width: f32,
    /// Width (px) of the sidebar when docked or open.
    pub controls_width: f32,
    /// Width (px) reserved for the narrative panel.
    pub narrative_width: f32,
    /// Offset (px) subtracted from half the viewport height to place the spinner.
    pub spinner_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            controls_hidden_width: 1000.0,
            controls_width: 220.0,
            narrative_width: 500.0,
            spinner_offset: 100.0,
        }
    }
}

/// Root configuration for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    /// Directory (native) or URL prefix (WASM) that dataset paths resolve against.
    pub data_root: String,
    /// Panels shown at start-up, by name.
    pub panels: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            data_root: "data".to_string(),
            panels: PanelId::ALL.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// localStorage key for persisting the configuration.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "strainview_config";

    /// Start-up panel selection. Unknown and repeated names are skipped.
    pub fn initial_panels(&self) -> Vec<PanelId> {
        let mut panels = Vec::new();
        for name in &self.panels {
            match name.parse::<PanelId>() {
                Ok(panel) if !panels.contains(&panel) => panels.push(panel),
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
        panels
    }

    /// Parses a configuration document, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded config from localStorage");
                Self::from_json(&json)
            }
            _ => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Save configuration to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save config: {:?}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}

    /// Records the current panel selection. Returns true if it changed.
    pub fn remember_panels(&mut self, panels: &[PanelId]) -> bool {
        let names: Vec<String> = panels.iter().map(|p| p.to_string()).collect();
        if names == self.panels {
            return false;
        }
        self.panels = names;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"layout": {"controls_width": 300.0}}"#);

        assert_eq!(config.layout.controls_width, 300.0);
        assert_eq!(config.layout.controls_hidden_width, 1000.0);
        assert_eq!(config.data_root, "data");
    }

    #[test]
    fn test_initial_panels_skip_unknown() {
        let config = AppConfig::from_json(r#"{"panels": ["map", "frequencies", "tree", "map"]}"#);
        assert_eq!(config.initial_panels(), vec![PanelId::Map, PanelId::Tree]);
        assert_eq!(AppConfig::default().initial_panels(), PanelId::ALL.to_vec());
    }

    #[test]
    fn test_remember_panels() {
        let mut config = AppConfig::default();
        assert!(!config.remember_panels(&PanelId::ALL));
        assert!(config.remember_panels(&[PanelId::Entropy]));
        assert_eq!(config.panels, vec!["entropy".to_string()]);
        assert_eq!(config.initial_panels(), vec![PanelId::Entropy]);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let config = AppConfig::from_json("{not json");
        assert_eq!(config, AppConfig::default());
    }
}
