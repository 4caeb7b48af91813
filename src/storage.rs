use crate::errors::StorageError;
use crate::models::{AppSettings, AttendanceRecord, Subject};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::fs;
use tracing::{debug, error, warn};

pub trait KeyValueStore: Clone + Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub subjects: String,
    pub attendance: String,
    pub settings: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            subjects: "attendance_subjects".to_string(),
            attendance: "attendance_records".to_string(),
            settings: "attendance_settings".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |err: std::io::Error| StorageError::Write {
            key: key.to_string(),
            message: err.to_string(),
        };

        fs::create_dir_all(&self.dir).await.map_err(write_err)?;
        // write-then-rename so a crash never leaves a truncated slot
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await.map_err(write_err)?;
        fs::rename(&tmp, &path).await.map_err(write_err)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(quota),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|err| StorageError::Read {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|err| StorageError::Write {
            key: key.to_string(),
            message: err.to_string(),
        })?;

        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(slot, _)| slot.as_str() != key)
                .map(|(slot, text)| slot.len() + text.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StorageError::Write {
                    key: key.to_string(),
                    message: format!("quota of {quota} bytes exceeded"),
                });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the three slots. Read failures fall back to defaults and
/// write failures are logged; neither reaches the caller.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub async fn load_subjects(&self) -> Vec<Subject> {
        self.load(&self.keys.subjects, Vec::new).await
    }

    pub async fn load_attendance(&self) -> Vec<AttendanceRecord> {
        self.load(&self.keys.attendance, Vec::new).await
    }

    pub async fn load_settings(&self) -> AppSettings {
        let stored: Value = self.load(&self.keys.settings, || Value::Null).await;
        merge_settings(&stored)
    }

    pub async fn save_subjects(&self, subjects: &[Subject]) -> bool {
        self.save(&self.keys.subjects, subjects).await
    }

    pub async fn save_attendance(&self, records: &[AttendanceRecord]) -> bool {
        self.save(&self.keys.attendance, records).await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> bool {
        self.save(&self.keys.settings, settings).await
    }

    pub async fn load<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.store.get(key).await {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(err) => {
                    error!("failed to parse slot '{key}': {err}");
                    default()
                }
            },
            Ok(None) => {
                debug!("slot '{key}' is empty, using default");
                default()
            }
            Err(err) => {
                error!("{err}");
                default()
            }
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(source) => {
                let err = StorageError::Encode {
                    key: key.to_string(),
                    source,
                };
                error!("{err}");
                return false;
            }
        };

        match self.store.set(key, &text).await {
            Ok(()) => true,
            Err(err) => {
                error!("{err}");
                false
            }
        }
    }
}

fn merge_settings(stored: &Value) -> AppSettings {
    let defaults = AppSettings::default();
    let Some(fields) = stored.as_object() else {
        if !stored.is_null() {
            warn!("settings slot is not an object, using defaults");
        }
        return defaults;
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    for (key, value) in fields {
        let previous = merged.insert(key.clone(), value.clone());
        if serde_json::from_value::<AppSettings>(Value::Object(merged.clone())).is_err() {
            warn!("ignoring invalid stored setting '{key}'");
            match previous {
                Some(previous) => merged.insert(key.clone(), previous),
                None => merged.remove(key),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}
