use std::{
    collections::BTreeSet,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::RwLock,
};

use fd_lock::RwLock as FileLock;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{KeyValueStore, StoreError};

const DATA_FILE: &str = "data.json";
const LOCK_FILE: &str = "data.json.lock";
const TMP_FILE: &str = "data.json.tmp";

/// A [KeyValueStore] backed by a single `data.json` file inside a data directory.
///
/// The file is read on [JsonFileStore::open] and kept in memory. [KeyValueStore::flush] takes an
/// exclusive lock on `data.json.lock`, re-reads `data.json`, applies only the keys this handle
/// set or removed, then writes `data.json.tmp` and renames it over `data.json`. Keys written by
/// other processes in the meantime are kept.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    data: Map<String, Value>,
    /// Keys set or removed since the last flush.
    dirty: BTreeSet<String>,
}

impl JsonFileStore {
    /// Open the store in `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        create_private_dir(&dir)?;

        let path = dir.join(DATA_FILE);
        let data = read_data(&path)?;

        debug!(path = %path.display(), entries = data.len(), "opened store");

        Ok(Self {
            dir,
            state: RwLock::new(State {
                data,
                dirty: BTreeSet::new(),
            }),
        })
    }

    /// Path of the `data.json` file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.data.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        state.data.insert(key.to_owned(), value);
        state.dirty.insert(key.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        state.data.remove(key);
        state.dirty.insert(key.to_owned());
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        let mut lock = FileLock::new(lock_file);
        let _guard = lock.write()?;

        let mut merged = read_data(&self.path())?;
        for key in &state.dirty {
            match state.data.get(key) {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        let contents = serde_json::to_vec_pretty(&merged)?;

        let tmp_path = self.dir.join(TMP_FILE);
        let mut tmp = private_file_options().open(&tmp_path)?;
        tmp.write_all(&contents)?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, self.path())?;

        debug!(
            path = %self.path().display(),
            entries = merged.len(),
            changed = state.dirty.len(),
            "flushed store"
        );
        state.data = merged;
        state.dirty.clear();
        Ok(())
    }
}

/// Contents of `data.json`. A missing or blank file is an empty store.
fn read_data(path: &Path) -> Result<Map<String, Value>, StoreError> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Map::new()),
        Ok(bytes) => match serde_json::from_slice(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject(path.display().to_string())),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
}
