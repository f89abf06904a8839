use crate::errors::StorageError;
use crate::models::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::{env, fs, path::Path, path::PathBuf};
use tracing::{debug, error, warn};

/// Slot holding the serialized task collection.
pub const STORAGE_KEY: &str = "task-board.tasks";

/// Version written into every saved envelope.
pub const SCHEMA_VERSION: u64 = 1;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/storage.json"))
}

/// Synchronous string key-value storage, shaped after browser local storage.
pub trait KeyValueStorage: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every slot in one JSON object file (`{"slot": "value", ...}`).
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(StorageError::Json(err)) => {
                warn!("replacing unreadable storage file {}: {err}", self.path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        slots.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(&slots)?;
        // Rename over the original so a torn write never leaves a partial file.
        let staging = staging_path(&self.path);
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-process storage with an optional quota counted over keys and values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(slot, _)| slot.as_str() != key)
            .map(|(slot, value)| slot.len() + value.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct StoredEnvelope {
    version: u64,
    #[serde(default)]
    tasks: Vec<Value>,
}

/// Loads and saves the whole task collection under a single storage slot.
/// Failures are logged and swallowed: the board degrades to in-memory only.
#[derive(Debug)]
pub struct TaskPersistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> TaskPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> Vec<Task> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!("failed to read task storage: {err}");
                return Vec::new();
            }
        };

        match decode_tasks(&raw) {
            Ok(tasks) => dedupe_ids(tasks),
            Err(err @ StorageError::UnsupportedVersion { .. }) => {
                warn!("discarding task storage: {err}");
                Vec::new()
            }
            Err(err) => {
                error!("failed to parse task storage: {err}");
                Vec::new()
            }
        }
    }

    /// Overwrites the slot with `tasks`. Returns whether the write landed.
    pub fn save(&mut self, tasks: &[Task]) -> bool {
        let payload = match encode_tasks(tasks) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to serialize tasks: {err}");
                return false;
            }
        };

        match self.storage.set_item(&self.key, &payload) {
            Ok(()) => {
                debug!(count = tasks.len(), "saved tasks");
                true
            }
            Err(err) => {
                error!("failed to write task storage: {err}");
                false
            }
        }
    }
}

fn encode_tasks(tasks: &[Task]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        tasks,
    })?)
}

fn decode_tasks(raw: &str) -> Result<Vec<Task>, StorageError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(items) => {
            warn!("upgrading unversioned task data ({} records)", items.len());
            Ok(upgrade_records(items))
        }
        Value::Object(_) => {
            let envelope: StoredEnvelope = serde_json::from_value(value)?;
            if envelope.version > SCHEMA_VERSION {
                return Err(StorageError::UnsupportedVersion {
                    found: envelope.version,
                    supported: SCHEMA_VERSION,
                });
            }
            if envelope.version < SCHEMA_VERSION {
                return Ok(upgrade_records(envelope.tasks));
            }
            Ok(serde_json::from_value(Value::Array(envelope.tasks))?)
        }
        _ => Err(StorageError::UnrecognizedLayout),
    }
}

/// Best-effort read of older records: whatever still parses is kept.
fn upgrade_records(items: Vec<Value>) -> Vec<Task> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!("skipping unreadable task record #{index}: {err}");
                None
            }
        })
        .collect()
}

fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let before = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();
    if unique.len() != before {
        warn!("dropped {} task(s) with duplicate ids", before - unique.len());
    }
    unique
}
