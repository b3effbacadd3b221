use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use vaultkeep_crypto::{
    CryptoError, EncString, EncStringParseError, KeyDecryptable, SymmetricCryptoKey,
};
use vaultkeep_state::{KeyValueStore, StoreError};

/// Reserved prefix marking entries whose value is ciphertext.
pub const PROTECTED_PREFIX: &str = "__PROTECTED__";

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ProtectedStoreError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The entry exists but is malformed or fails authentication
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Encrypted entries inside the plain [KeyValueStore].
///
/// Values are stored as the base64 encoded binary form of an [EncString] under
/// `__PROTECTED__{suffix}`.
pub struct ProtectedBlobStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProtectedBlobStore {
    #[allow(missing_docs)]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn storage_key(suffix: &str) -> String {
        format!("{PROTECTED_PREFIX}{suffix}")
    }

    /// Encrypt `plaintext` under `key` and persist it.
    pub fn set(
        &self,
        suffix: &str,
        plaintext: &[u8],
        key: &SymmetricCryptoKey,
    ) -> Result<(), ProtectedStoreError> {
        let encrypted = EncString::encrypt(plaintext, key)?;
        let value = STANDARD.encode(encrypted.to_buffer()?);

        self.store.set(&Self::storage_key(suffix), Value::String(value))?;
        self.store.flush()?;

        debug!(suffix, "stored protected entry");
        Ok(())
    }

    /// Read and decrypt an entry.
    ///
    /// Returns `Ok(None)` when nothing is stored. A malformed entry is reported as
    /// [CryptoError::Format] and an entry encrypted under a different key as
    /// [CryptoError::AuthenticationFailed].
    pub fn get(
        &self,
        suffix: &str,
        key: &SymmetricCryptoKey,
    ) -> Result<Option<Vec<u8>>, ProtectedStoreError> {
        let Some(value) = self.store.get(&Self::storage_key(suffix))? else {
            return Ok(None);
        };

        let Value::String(encoded) = value else {
            return Err(CryptoError::from(EncStringParseError::NoType).into());
        };

        let buffer = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::from(EncStringParseError::from(e)))?;
        let encrypted = EncString::from_buffer(&buffer)?;

        let plaintext: Vec<u8> = encrypted.decrypt_with_key(key)?;
        Ok(Some(plaintext))
    }

    /// Remove an entry, if present.
    pub fn remove(&self, suffix: &str) -> Result<(), ProtectedStoreError> {
        self.store.remove(&Self::storage_key(suffix))?;
        self.store.flush()?;

        debug!(suffix, "removed protected entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vaultkeep_state::MemoryStore;

    use super::*;

    fn setup() -> (Arc<MemoryStore>, ProtectedBlobStore) {
        let store = Arc::new(MemoryStore::new());
        let protected = ProtectedBlobStore::new(store.clone());
        (store, protected)
    }

    #[test]
    fn test_set_get_round_trip() {
        let (store, protected) = setup();
        let key = SymmetricCryptoKey::generate();

        protected.set("u1_vault_auto", b"secret", &key).unwrap();

        assert_eq!(
            protected.get("u1_vault_auto", &key).unwrap(),
            Some(b"secret".to_vec())
        );
        assert_eq!(store.keys().unwrap(), vec!["__PROTECTED__u1_vault_auto"]);
    }

    #[test]
    fn test_stored_value_is_base64_binary_enc_string() {
        let (store, protected) = setup();
        let key = SymmetricCryptoKey::generate();

        protected.set("u1_vault_auto", &[0u8; 64], &key).unwrap();

        let Some(Value::String(stored)) = store.get("__PROTECTED__u1_vault_auto").unwrap() else {
            panic!("expected a string value");
        };
        let buffer = STANDARD.decode(stored).unwrap();
        assert_eq!(buffer[0], 2);
        // 64 bytes of plaintext pad to 80 bytes of ciphertext
        assert_eq!(buffer.len(), 1 + 16 + 32 + 80);
    }

    #[test]
    fn test_missing_entry() {
        let (_, protected) = setup();
        let result = protected.get("u1_vault_auto", &SymmetricCryptoKey::generate());
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_wrong_key_is_authentication_failure() {
        let (_, protected) = setup();
        protected
            .set("u1_vault_auto", b"secret", &SymmetricCryptoKey::generate())
            .unwrap();

        let result = protected.get("u1_vault_auto", &SymmetricCryptoKey::generate());
        assert!(matches!(
            result,
            Err(ProtectedStoreError::Crypto(CryptoError::AuthenticationFailed))
        ));
    }

    #[test]
    fn test_short_buffer_is_format_error() {
        let (store, protected) = setup();
        let mut short = vec![2u8];
        short.extend_from_slice(&[0u8; 20]);
        store
            .set("__PROTECTED__u1_vault_auto", json!(STANDARD.encode(short)))
            .unwrap();

        let result = protected.get("u1_vault_auto", &SymmetricCryptoKey::generate());
        assert!(matches!(
            result,
            Err(ProtectedStoreError::Crypto(CryptoError::Format(
                EncStringParseError::BufferTooShort { .. }
            )))
        ));
    }

    #[test]
    fn test_invalid_base64_is_format_error() {
        let (store, protected) = setup();
        store
            .set("__PROTECTED__u1_vault_auto", json!("%%%"))
            .unwrap();

        let result = protected.get("u1_vault_auto", &SymmetricCryptoKey::generate());
        assert!(matches!(
            result,
            Err(ProtectedStoreError::Crypto(CryptoError::Format(_)))
        ));
    }

    #[test]
    fn test_remove() {
        let (store, protected) = setup();
        let key = SymmetricCryptoKey::generate();
        protected.set("u1_vault_auto", b"secret", &key).unwrap();

        protected.remove("u1_vault_auto").unwrap();

        assert!(store.keys().unwrap().is_empty());
        assert!(matches!(protected.get("u1_vault_auto", &key), Ok(None)));
    }
}
