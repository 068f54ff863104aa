//! Application configuration.
//!
//! Values are layered: built-in defaults, then `~/.config/fleetwatch/config.toml`,
//! then `FLEETWATCH_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{filter::JsonFileStore, models::VehicleRecord};

/// Location of the config file below the user's config directory.
pub const CONFIG_FILE: &str = "fleetwatch/config.toml";

const DEFAULT_BASE_URL: &str = "https://www.leitstellenspiel.de";
const DEFAULT_CATALOG_URL: &str = "https://api.lss-manager.de/de_DE/vehicles";
const DEFAULT_USER_AGENT: &str = concat!("fleetwatch/", env!("CARGO_PKG_VERSION"));

/// Runtime settings for the fleet monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Game host; the inventory and assignment pages live below it.
    pub base_url: String,
    /// Vehicle type catalog endpoint.
    pub catalog_url: String,
    /// File holding the persisted filter settings.
    pub settings_path: PathBuf,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            settings_path: JsonFileStore::default_path(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (which may be missing) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("catalog_url", defaults.catalog_url)?
            .set_default(
                "settings_path",
                defaults.settings_path.to_string_lossy().into_owned(),
            )?
            .set_default("user_agent", defaults.user_agent)?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("FLEETWATCH"))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Fleet inventory endpoint.
    pub fn inventory_url(&self) -> String {
        format!("{}/api/vehicles", self.base_url)
    }

    /// Absolute link to the personnel assignment page of a vehicle.
    pub fn assignment_url(&self, vehicle: &VehicleRecord) -> String {
        format!("{}{}", self.base_url, vehicle.assignment_path())
    }
}

/// Default config file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE)
}

/// Write a commented default config file when none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }

    let defaults = AppConfig::default();
    let content = format!(
        "# fleetwatch configuration\n\
         # Every value can be overridden with a FLEETWATCH_<KEY> environment variable.\n\
         \n\
         base_url = {:?}\n\
         catalog_url = {:?}\n\
         # settings_path = {:?}\n\
         # user_agent = {:?}\n",
        defaults.base_url,
        defaults.catalog_url,
        defaults.settings_path.display().to_string(),
        defaults.user_agent,
    );
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
