/// Application settings
///
/// Settings are read once at startup from a JSON file in the user's config
/// directory and never written back:
/// - Linux: ~/.config/food-lookup/settings.json
/// - macOS: ~/Library/Application Support/food-lookup/settings.json
/// - Windows: %APPDATA%\food-lookup\settings.json
///
/// Every field has a default, so a partial file only overrides what it names.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;

/// Placeholder substituted with the normalized barcode in `lookup_endpoint`.
pub const BARCODE_PLACEHOLDER: &str = "{barcode}";

const DEFAULT_LOOKUP_ENDPOINT: &str =
    "https://world.openfoodfacts.org/api/v0/product/{barcode}.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// SQLite file holding the `foods` table
    pub dataset_path: PathBuf,
    /// Product lookup URL template, must contain `{barcode}`
    pub lookup_endpoint: String,
    /// User-Agent sent with every lookup request
    pub user_agent: String,
    /// Bounding box (pixels) for decoded product pictures
    pub thumbnail_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            lookup_endpoint: DEFAULT_LOOKUP_ENDPOINT.to_string(),
            user_agent: format!("food-lookup/{}", env!("CARGO_PKG_VERSION")),
            thumbnail_size: 128,
        }
    }
}

impl Settings {
    /// Load settings from the standard location, falling back to defaults.
    ///
    /// A malformed file is logged and ignored; the app still starts.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            info!("No config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(settings) => {
                info!("⚙️  Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("food-lookup");
        path.push("settings.json");
        Some(path)
    }
}

/// Where the bundled dataset lives when no settings override it.
fn default_dataset_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("food-lookup");
    path.push("foods_us.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "thumbnail_size": 64 }"#).unwrap();

        assert_eq!(settings.thumbnail_size, 64);
        assert_eq!(settings.lookup_endpoint, DEFAULT_LOOKUP_ENDPOINT);
        assert!(settings.dataset_path.ends_with("foods_us.db"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "dataset_path": "/tmp/foods.db" }"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();

        assert_eq!(settings.dataset_path, PathBuf::from("/tmp/foods.db"));
    }
}
