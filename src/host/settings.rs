//! Host settings: the binding values and core tunables.
//!
//! On wasm32 settings are persisted to localStorage so they survive page
//! reloads. The access token is never persisted.

use serde::{Deserialize, Serialize};

use draggable_markers::{MapBindings, SyncConfig};

/// Environment variable read for the access token on native builds.
pub const ACCESS_TOKEN_ENV: &str = "MARKERS_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub bindings: MapBindings,
    pub sync: SyncConfig,
}

impl HostSettings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "draggable_markers_settings";

    /// Serializes everything except the access token.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut persisted = self.clone();
        persisted.bindings.access_token.clear();
        serde_json::to_string(&persisted)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from localStorage.
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

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Native builds start from defaults, with the token from the environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) => settings.bindings.access_token = token,
            Err(_) => log::info!(
                "{} not set; the map stays inert until a token is entered",
                ACCESS_TOKEN_ENV
            ),
        }
        settings
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match self.to_json() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save settings: {:?}", e);
        } else {
            log::debug!("Saved settings to localStorage");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use draggable_markers::DragWriteBack;

    #[test]
    fn test_token_is_not_persisted() {
        let mut settings = HostSettings::default();
        settings.bindings.access_token = "pk.secret".to_string();
        settings.sync.drag_write_back = DragWriteBack::Merge;

        let json = settings.to_json().unwrap();
        assert!(!json.contains("pk.secret"));

        let restored = HostSettings::from_json(&json).unwrap();
        assert!(restored.bindings.access_token.is_empty());
        assert_eq!(restored.sync.drag_write_back, DragWriteBack::Merge);
        assert_eq!(restored.bindings.points, settings.bindings.points);
        assert_eq!(restored.bindings.geo_json, settings.bindings.geo_json);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let restored = HostSettings::from_json(r#"{ "bindings": { "zoom": 4 } }"#).unwrap();

        assert_eq!(restored.bindings.zoom, 4.0);
        assert_eq!(restored.bindings.longitude, "-122.4376");
        assert_eq!(restored.sync, SyncConfig::default());
    }
}
