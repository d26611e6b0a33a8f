//! Persisted viewer settings and the storage backends they are loaded from.
//!
//! Settings are stored key by key, each value JSON-encoded, the way a browser
//! key-value store would hold them. Loading never fails: a missing or
//! malformed key falls back to its default (and the default is written back),
//! and an unreachable backend yields the full default set.

use crate::color::Color;
use crate::error::AttractorError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Lower bound offered to users for `maxPoints`.
pub const MIN_MAX_POINTS: usize = 500;
/// Upper bound offered to users for `maxPoints`.
pub const MAX_MAX_POINTS: usize = 50_000;
/// Above this many points a performance warning is raised.
pub const HIGH_MAX_POINTS: usize = 7_500;

pub const KEY_AUTO_ROTATE: &str = "autoRotate";
pub const KEY_AUTO_ROTATE_SPEED: &str = "autoRotateSpeed";
pub const KEY_MAX_POINTS: &str = "maxPoints";
pub const KEY_LINE_WIDTH: &str = "lineWidth";
pub const KEY_COLOR: &str = "color";

/// Key-value persistence collaborator.
pub trait SettingsStorage {
    /// Raw stored value for `key`, `None` if never written.
    fn get(&self, key: &str) -> Result<Option<String>, AttractorError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AttractorError>;
}

/// Values restored across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    pub max_points: usize,
    pub line_width: f64,
    pub color: Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            max_points: HIGH_MAX_POINTS,
            line_width: 0.5,
            color: Color::WHITE,
        }
    }
}

impl Settings {
    /// Loads every key independently, tolerating absent, partial or broken storage.
    pub fn load(storage: &dyn SettingsStorage) -> Settings {
        let defaults = Settings::default();
        let fields = match defaults.encode_fields() {
            Ok(fields) => fields,
            Err(e) => {
                log::warn!("could not encode default settings: {e}");
                return defaults;
            }
        };

        let mut loaded = Map::new();
        for (key, default) in fields {
            match storage.get(key) {
                Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                    Ok(v) => {
                        loaded.insert(key.to_string(), v);
                    }
                    Err(e) => log::warn!("ignoring malformed setting {key}: {e}"),
                },
                Ok(None) => {
                    if let Err(e) = storage.set(key, &default.to_string()) {
                        log::warn!("could not write default for {key}: {e}");
                    }
                }
                Err(e) => {
                    log::warn!("settings storage unavailable, using defaults: {e}");
                    return defaults;
                }
            }
        }
        Settings::from_json(&Value::Object(loaded))
    }

    /// Builds settings from a (possibly partial) JSON object.
    pub fn from_json(value: &Value) -> Settings {
        let d = Settings::default();
        Settings {
            auto_rotate: value
                .get(KEY_AUTO_ROTATE)
                .and_then(Value::as_bool)
                .unwrap_or(d.auto_rotate),
            auto_rotate_speed: value
                .get(KEY_AUTO_ROTATE_SPEED)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
                .unwrap_or(d.auto_rotate_speed),
            max_points: value
                .get(KEY_MAX_POINTS)
                .and_then(Value::as_u64)
                .map(|v| clamp_max_points(v as usize))
                .unwrap_or(d.max_points),
            line_width: value
                .get(KEY_LINE_WIDTH)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(d.line_width),
            color: value
                .get(KEY_COLOR)
                .and_then(Value::as_str)
                .and_then(|s| Color::from_hex(s).ok())
                .unwrap_or(d.color),
        }
    }

    /// Writes every key back.
    pub fn store(&self, storage: &dyn SettingsStorage) -> Result<(), AttractorError> {
        for (key, value) in self.encode_fields()? {
            storage.set(key, &value.to_string())?;
        }
        Ok(())
    }

    /// Writes a single key back.
    pub fn store_key(&self, storage: &dyn SettingsStorage, key: &str) -> Result<(), AttractorError> {
        let (_, value) = self
            .encode_fields()?
            .into_iter()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| AttractorError::StorageUnavailable(format!("unknown setting '{key}'")))?;
        storage.set(key, &value.to_string())
    }

    fn encode_fields(&self) -> Result<Vec<(&'static str, Value)>, AttractorError> {
        let encoded = serde_json::to_value(self)
            .map_err(|e| AttractorError::StorageUnavailable(e.to_string()))?;
        Ok([
            KEY_AUTO_ROTATE,
            KEY_AUTO_ROTATE_SPEED,
            KEY_MAX_POINTS,
            KEY_LINE_WIDTH,
            KEY_COLOR,
        ]
        .into_iter()
        .map(|k| (k, encoded.get(k).cloned().unwrap_or(Value::Null)))
        .collect())
    }
}

/// Clamps a point budget to the range offered to users.
pub fn clamp_max_points(n: usize) -> usize {
    n.clamp(MIN_MAX_POINTS, MAX_MAX_POINTS)
}

/// In-process storage, also used as the fallback when nothing else is configured.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AttractorError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AttractorError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a single JSON object file, `{ key: "<json>" }`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AttractorError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AttractorError::StorageUnavailable(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            AttractorError::StorageUnavailable(format!("{}: {e}", self.path.display()))
        })
    }
}

impl SettingsStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AttractorError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AttractorError> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&all)
            .map_err(|e| AttractorError::StorageUnavailable(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| {
            AttractorError::StorageUnavailable(format!("{}: {e}", self.path.display()))
        })
    }
}
