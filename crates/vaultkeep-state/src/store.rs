use serde_json::Value;
use thiserror::Error;

/// An error resulting from operations on a [KeyValueStore].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be serialized or deserialized.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    /// The backing file does not contain a JSON object.
    #[error("Storage file {0} is not a JSON object")]
    NotAnObject(String),

    /// Another thread panicked while holding the store.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Plain key/value persistence.
///
/// Values are arbitrary JSON. Mutations are buffered until [KeyValueStore::flush] is called,
/// which makes every change since the last flush durable at once.
pub trait KeyValueStore: Send + Sync {
    /// Retrieves a value by its key.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Sets a value, replacing any existing value under the same key.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    /// Removes a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Persist all pending changes.
    fn flush(&self) -> Result<(), StoreError>;
}
