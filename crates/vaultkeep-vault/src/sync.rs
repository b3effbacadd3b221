use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use vaultkeep_core::require;
use vaultkeep_state::{register_setting_key, settings::Setting, KeyValueStore};

use crate::VaultParseError;

register_setting_key!(
    /// Raw vault records of an account, keyed by record id.
    const CIPHERS: BTreeMap<String, Value> = user("ciphers", "ciphers")
);

/// The parts of a sync payload that are kept locally.
///
/// Vault records are kept as raw JSON so that a single malformed record does not prevent the
/// rest of the vault from being stored, they are parsed when decrypted.
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// List of ciphers accessible by the user
    pub ciphers: Vec<Value>,
}

impl SyncResponse {
    /// Parse a sync payload, which must carry a `ciphers` array.
    pub fn parse(payload: &[u8]) -> Result<Self, VaultParseError> {
        #[derive(Deserialize)]
        struct Raw {
            ciphers: Option<Vec<Value>>,
        }

        let raw: Raw = serde_json::from_slice(payload)?;
        Ok(SyncResponse {
            ciphers: require!(raw.ciphers),
        })
    }
}

/// Encrypted vault records of a single account, as last synced.
///
/// Stored as one object mapping each record's `id` to the record.
pub struct CipherStore {
    setting: Setting<BTreeMap<String, Value>>,
    store: Arc<dyn KeyValueStore>,
}

impl CipherStore {
    #[allow(missing_docs)]
    pub fn new(store: Arc<dyn KeyValueStore>, user_id: Uuid) -> Self {
        Self {
            setting: Setting::for_user(store.clone(), CIPHERS, &user_id.to_string()),
            store,
        }
    }

    /// Replace the stored records with the ones from `sync`.
    ///
    /// Records without a string `id` cannot be addressed and are dropped. Returns the number of
    /// records stored.
    pub fn replace(&self, sync: SyncResponse) -> Result<usize, VaultParseError> {
        let mut records = BTreeMap::new();
        for record in sync.ciphers {
            match record.get("id").and_then(Value::as_str) {
                Some(id) => {
                    records.insert(id.to_owned(), record);
                }
                None => warn!("dropping vault record without an id"),
            }
        }

        let count = records.len();
        self.setting.update(records)?;
        self.store.flush()?;

        info!(count, "stored vault items");
        Ok(count)
    }

    /// All stored records, empty if the account never synced.
    pub fn list(&self) -> Result<Vec<Value>, VaultParseError> {
        Ok(self
            .setting
            .get()?
            .map(|records| records.into_values().collect())
            .unwrap_or_default())
    }

    /// The record with the given `id`, compared case-insensitively.
    pub fn find(&self, id: &str) -> Result<Option<Value>, VaultParseError> {
        let Some(mut records) = self.setting.get()? else {
            return Ok(None);
        };

        if let Some(record) = records.remove(id) {
            return Ok(Some(record));
        }
        Ok(records
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, record)| record))
    }

    /// Remove the stored records. The change is not flushed.
    pub fn clear(&self) -> Result<(), VaultParseError> {
        Ok(self.setting.delete()?)
    }
}
