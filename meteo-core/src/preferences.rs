//! Weather-alert toggles and the key-value store they persist to.
//!
//! The flags are only stored; nothing in the crate raises alerts.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertKind {
    Rain,
    Storm,
    Snow,
    Temperature,
    Wind,
}

impl AlertKind {
    pub const fn all() -> &'static [AlertKind] {
        &[
            AlertKind::Rain,
            AlertKind::Storm,
            AlertKind::Snow,
            AlertKind::Temperature,
            AlertKind::Wind,
        ]
    }

    /// Key under which the flag is persisted.
    pub fn key(&self) -> &'static str {
        match self {
            AlertKind::Rain => "rain_notification",
            AlertKind::Storm => "storm_notification",
            AlertKind::Snow => "snow_notification",
            AlertKind::Temperature => "temperature_notification",
            AlertKind::Wind => "wind_notification",
        }
    }

    pub fn default_enabled(&self) -> bool {
        matches!(self, AlertKind::Rain | AlertKind::Storm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Rain => "rain",
            AlertKind::Storm => "storm",
            AlertKind::Snow => "snow",
            AlertKind::Temperature => "temperature",
            AlertKind::Wind => "wind",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AlertKind::Rain => "🌧",
            AlertKind::Storm => "⛈",
            AlertKind::Snow => "🌨",
            AlertKind::Temperature => "🌡",
            AlertKind::Wind => "💨",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Rain => "Уведомления о дожде",
            AlertKind::Storm => "Штормовое предупреждение",
            AlertKind::Snow => "Уведомления о снеге",
            AlertKind::Temperature => "Экстремальная температура",
            AlertKind::Wind => "Сильный ветер",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            AlertKind::Rain => "Предупреждать о приближающемся дожде",
            AlertKind::Storm => "Уведомлять о приближении грозы или шторма",
            AlertKind::Snow => "Предупреждать о снегопаде",
            AlertKind::Temperature => "Уведомлять о резких изменениях температуры",
            AlertKind::Wind => "Предупреждать о сильном ветре",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AlertKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        AlertKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == lower || k.key() == lower)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown alert kind '{value}'. Supported kinds: rain, storm, snow, temperature, wind."
                )
            })
    }
}

/// Boolean key-value persistence.
pub trait PreferenceStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()>;
}

/// Store kept only in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, bool>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.get(key).copied())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Flat TOML file of `key = bool` lines, rewritten on every write.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl FilePreferenceStore {
    /// Opens `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    /// `preferences.toml` next to the config file.
    pub fn open_default() -> Result<Self> {
        Self::open(Config::config_dir()?.join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(&self.values)
            .context("Failed to serialize preferences to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.get(key).copied())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Current state of every alert toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPreferences {
    flags: BTreeMap<AlertKind, bool>,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        let flags = AlertKind::all().iter().map(|k| (*k, k.default_enabled())).collect();
        Self { flags }
    }
}

impl NotificationPreferences {
    /// Reads every flag from `store`, falling back to the defaults.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self> {
        let mut prefs = Self::default();
        for kind in AlertKind::all() {
            if let Some(value) = store.get_bool(kind.key())? {
                prefs.flags.insert(*kind, value);
            }
        }
        Ok(prefs)
    }

    pub fn is_enabled(&self, kind: AlertKind) -> bool {
        self.flags.get(&kind).copied().unwrap_or_else(|| kind.default_enabled())
    }

    /// Updates the flag and writes it through to `store` immediately.
    pub fn set(
        &mut self,
        kind: AlertKind,
        enabled: bool,
        store: &mut dyn PreferenceStore,
    ) -> Result<()> {
        store.set_bool(kind.key(), enabled)?;
        self.flags.insert(kind, enabled);
        debug!(alert = %kind, enabled, "Notification preference saved");
        Ok(())
    }

    /// Flips the flag, persists it, and returns the new value.
    pub fn toggle(&mut self, kind: AlertKind, store: &mut dyn PreferenceStore) -> Result<bool> {
        let enabled = !self.is_enabled(kind);
        self.set(kind, enabled, store)?;
        Ok(enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AlertKind, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_rain_and_storm_only() {
        let prefs = NotificationPreferences::default();

        assert!(prefs.is_enabled(AlertKind::Rain));
        assert!(prefs.is_enabled(AlertKind::Storm));
        assert!(!prefs.is_enabled(AlertKind::Snow));
        assert!(!prefs.is_enabled(AlertKind::Temperature));
        assert!(!prefs.is_enabled(AlertKind::Wind));
    }

    #[test]
    fn load_from_empty_store_yields_defaults() {
        let store = MemoryPreferenceStore::new();
        let prefs = NotificationPreferences::load(&store).unwrap();
        assert_eq!(prefs, NotificationPreferences::default());
    }

    #[test]
    fn load_prefers_stored_values() {
        let mut store = MemoryPreferenceStore::new();
        store.set_bool("rain_notification", false).unwrap();
        store.set_bool("wind_notification", true).unwrap();

        let prefs = NotificationPreferences::load(&store).unwrap();
        assert!(!prefs.is_enabled(AlertKind::Rain));
        assert!(prefs.is_enabled(AlertKind::Wind));
        assert!(prefs.is_enabled(AlertKind::Storm));
    }

    #[test]
    fn toggle_writes_through_immediately() {
        let mut store = MemoryPreferenceStore::new();
        let mut prefs = NotificationPreferences::load(&store).unwrap();

        assert!(prefs.toggle(AlertKind::Snow, &mut store).unwrap());
        assert_eq!(store.get_bool("snow_notification").unwrap(), Some(true));

        assert!(!prefs.toggle(AlertKind::Snow, &mut store).unwrap());
        assert_eq!(store.get_bool("snow_notification").unwrap(), Some(false));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.toml");

        {
            let mut store = FilePreferenceStore::open(&path).unwrap();
            let mut prefs = NotificationPreferences::load(&store).unwrap();
            prefs.set(AlertKind::Temperature, true, &mut store).unwrap();
            prefs.toggle(AlertKind::Rain, &mut store).unwrap();
        }

        let store = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        let prefs = NotificationPreferences::load(&store).unwrap();
        assert!(prefs.is_enabled(AlertKind::Temperature));
        assert!(!prefs.is_enabled(AlertKind::Rain));
        assert!(prefs.is_enabled(AlertKind::Storm));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("temperature_notification = true"));
        assert!(contents.contains("rain_notification = false"));
    }

    #[test]
    fn alert_kind_parses_short_and_key_names() {
        assert_eq!(AlertKind::try_from("rain").unwrap(), AlertKind::Rain);
        assert_eq!(AlertKind::try_from("Storm").unwrap(), AlertKind::Storm);
        assert_eq!(AlertKind::try_from("wind_notification").unwrap(), AlertKind::Wind);

        let err = AlertKind::try_from("hail").unwrap_err();
        assert!(err.to_string().contains("Unknown alert kind"));
    }
}
