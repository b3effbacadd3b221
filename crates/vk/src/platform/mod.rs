use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use vaultkeep_core::key_management::{KeyHierarchyError, KeyHierarchyManager};
use vaultkeep_state::KeyValueStore;
use vaultkeep_vault::CipherStore;

mod state;
mod status;

pub(crate) use status::status;

/// Everything a command needs from the data directory.
pub(crate) struct AppState {
    store: Arc<dyn KeyValueStore>,
    pub manager: KeyHierarchyManager,
}

impl AppState {
    pub fn open() -> Result<Self, state::StateError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(state::open_store()?);
        Ok(Self {
            manager: KeyHierarchyManager::new(store.clone()),
            store,
        })
    }

    /// The active account, failing with "not logged in" when there is none.
    pub fn active_user(&self) -> Result<Uuid, KeyHierarchyError> {
        self.manager
            .active_user_id()?
            .ok_or(KeyHierarchyError::NotLoggedIn)
    }

    pub fn ciphers(&self, user_id: Uuid) -> CipherStore {
        CipherStore::new(self.store.clone(), user_id)
    }
}

/// Read a server response supplied as a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        std::fs::read(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&contents)
        .wrap_err_with(|| format!("Failed to parse {}", path.display()))
}
