//! Setting handles for type-safe access to individual settings.

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::{Key, Scope};
use crate::{KeyValueStore, StoreError};

/// A handle to a single setting value in storage.
///
/// Changes made through [Setting::update] and [Setting::delete] are buffered by the store until
/// it is flushed.
pub struct Setting<T> {
    store: Arc<dyn KeyValueStore>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Setting<T> {
    /// Handle to a [Scope::Global] setting.
    ///
    /// A user scoped key is resolved with an empty user id, which never collides with a real
    /// account.
    pub fn global(store: Arc<dyn KeyValueStore>, key: Key<T>) -> Self {
        let name = match key.scope() {
            Scope::Global => key.global_name(),
            Scope::User => key.user_name(""),
        };
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    /// Handle to a [Scope::User] setting owned by `user_id`.
    pub fn for_user(store: Arc<dyn KeyValueStore>, key: Key<T>, user_id: &str) -> Self {
        let name = match key.scope() {
            Scope::Global => key.global_name(),
            Scope::User => key.user_name(user_id),
        };
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    /// The raw storage key this handle reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.name
    }

    /// Get the current value of this setting.
    ///
    /// Returns `None` if the setting doesn't exist in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails, which may indicate:
    /// - Schema evolution problems (type definition changed)
    /// - Data corruption
    /// - Type mismatch (wrong `Key<T>` type for stored data)
    pub fn get(&self) -> Result<Option<T>, SettingsError>
    where
        T: DeserializeOwned,
    {
        match self.store.get(&self.name)? {
            Some(value) => Ok(Some(serde_json::from_value::<T>(value)?)),
            None => Ok(None),
        }
    }

    /// Update (or create) this setting with a new value.
    pub fn update(&self, value: T) -> Result<(), SettingsError>
    where
        T: Serialize,
    {
        let json_value = serde_json::to_value(&value)?;
        self.store.set(&self.name, json_value)?;

        Ok(())
    }

    /// Delete this setting from storage.
    pub fn delete(&self) -> Result<(), SettingsError> {
        self.store.remove(&self.name)?;

        Ok(())
    }
}

/// Errors that can occur when working with settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to serialize/deserialize setting value
    #[error("Failed to serialize/deserialize setting: {0}")]
    Json(#[from] serde_json::Error),
    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
