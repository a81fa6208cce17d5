use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use placekit_input::BindingOverrides;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default location of the host configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "placekit.toml";

/// Host configuration loaded from `placekit.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacekitConfig {
    /// Directory scanned by the filesystem catalog service.
    pub library_dir: PathBuf,
    /// Directory holding persisted key-value records.
    pub storage_dir: PathBuf,
    /// Whether a disk-backed catalog service exists. Without one the scene
    /// registry is the only catalog source.
    pub disk_service: bool,
    /// Append scene items after disk items when a disk service exists.
    pub scene_supplement: bool,
    /// Action name → key tokens.
    pub bindings: BindingOverrides,
}

impl Default for PlacekitConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("library"),
            storage_dir: PathBuf::from(".placekit"),
            disk_service: true,
            scene_supplement: true,
            bindings: BindingOverrides::default(),
        }
    }
}

impl PlacekitConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PlacekitConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PlacekitConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                PlacekitConfig::default()
            }
        }
    }

    /// Write configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
