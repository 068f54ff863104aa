use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::Write,
    path::PathBuf,
};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::models::VehicleTypeId;

use super::{FilterConfig, FilterMode};

/// Storage key holding the JSON list of configured type identifiers.
pub const TYPE_IDS_KEY: &str = "fleetwatch.filter.type_ids";
/// Storage key holding the filter mode string.
pub const MODE_KEY: &str = "fleetwatch.filter.mode";

/// Settings file path relative to the user's config directory.
pub const DEFAULT_SETTINGS_FILE: &str = "fleetwatch/settings.json";

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a single entry.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write all entries at once; readers observe either none or all of them.
    fn set_all(&self, entries: &[(&str, String)]) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<()> {
        (**self).set_all(entries)
    }
}

/// In-process store, used when embedding the core and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut guard = self.entries.lock();
        for (key, value) in entries {
            guard.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the settings file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_SETTINGS_FILE)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(entries)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let _guard = self.lock.lock();
        let mut current = match self.read_entries() {
            Ok(current) => current,
            Err(err) => {
                warn!("Replacing unreadable settings file: {err:#}");
                BTreeMap::new()
            }
        };
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let serialised = serde_json::to_vec_pretty(&current)?;
        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
        temp.write_all(&serialised)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Loads and saves the filter configuration through a [`KeyValueStore`].
pub struct FilterStore<S> {
    store: S,
}

impl<S: KeyValueStore> FilterStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the backing store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Read the persisted configuration, falling back to defaults for anything
    /// absent or unreadable. Never fails.
    pub fn load(&self) -> FilterConfig {
        FilterConfig {
            type_ids: self.load_type_ids(),
            mode: self.load_mode(),
        }
    }

    /// Persist both fields of `config` in a single write.
    pub fn save(&self, config: &FilterConfig) -> Result<()> {
        let ids: Vec<VehicleTypeId> = config.type_ids.iter().copied().collect();
        let serialised = serde_json::to_string(&ids).context("failed to serialize type ids")?;
        self.store.set_all(&[
            (TYPE_IDS_KEY, serialised),
            (MODE_KEY, config.mode.as_str().to_string()),
        ])?;
        info!(mode = %config.mode, types = ids.len(), "Filter configuration saved");
        Ok(())
    }

    fn load_type_ids(&self) -> BTreeSet<VehicleTypeId> {
        let raw = match self.store.get(TYPE_IDS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                warn!("Failed to read stored type ids: {err:#}");
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<Vec<VehicleTypeId>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                warn!(value = %raw, "Ignoring malformed stored type ids: {err}");
                BTreeSet::new()
            }
        }
    }

    fn load_mode(&self) -> FilterMode {
        match self.store.get(MODE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                warn!("{err}, using {}", FilterMode::default());
                FilterMode::default()
            }),
            Ok(None) => FilterMode::default(),
            Err(err) => {
                warn!("Failed to read stored filter mode: {err:#}");
                FilterMode::default()
            }
        }
    }
}
