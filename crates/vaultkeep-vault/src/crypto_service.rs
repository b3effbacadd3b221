use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;
use vaultkeep_core::key_management::VaultKeyHandle;
use vaultkeep_crypto::EncString;

use crate::{Cipher, CipherView, DecryptError, VaultParseError};

/// Stands in for a field that failed to decrypt.
pub const DECRYPT_ERROR_MARKER: &str = "[error: cannot decrypt]";

/// The result of decrypting a list of vault records.
///
/// Contains both the items that decrypted and the records that could not be parsed.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DecryptCipherListResult {
    /// Successfully decrypted items.
    pub successes: Vec<CipherView>,
    /// Records that failed to decrypt.
    pub failures: Vec<CipherFailure>,
}

/// A record that [VaultCryptoService::decrypt_batch] skipped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CipherFailure {
    /// The record's `id`, when it has one.
    pub id: Option<String>,
    /// Why the record was skipped.
    pub reason: String,
}

/// Decrypts vault items with a resolved vault key.
pub struct VaultCryptoService<'a> {
    key: &'a VaultKeyHandle,
}

impl<'a> VaultCryptoService<'a> {
    #[allow(missing_docs)]
    pub fn new(key: &'a VaultKeyHandle) -> Self {
        Self { key }
    }

    /// Decrypt a single text-form [EncString].
    ///
    /// An absent or empty value is returned as `""` without touching the key.
    pub fn decrypt_field(&self, text: Option<&str>) -> Result<String, DecryptError> {
        let text = match text {
            None | Some("") => return Ok(String::new()),
            Some(text) => text,
        };

        let enc: EncString = text.parse()?;
        Ok(self.key.decrypt(&enc)?)
    }

    /// Decrypt a vault item.
    ///
    /// Every field is decrypted on its own. A field that fails, the name included, is logged and
    /// replaced with [DECRYPT_ERROR_MARKER].
    pub fn decrypt_item(&self, cipher: &Cipher) -> CipherView {
        let d = FieldDecryptor {
            key: self.key,
            cipher_id: cipher.id,
        };

        CipherView {
            id: cipher.id,
            organization_id: cipher.organization_id,
            folder_id: cipher.folder_id,
            r#type: cipher.r#type,
            name: d.decrypt_required("name", &cipher.name),
            notes: d.decrypt("notes", &cipher.notes),
            login: cipher.login.as_ref().map(|l| l.decrypt_lossy(&d)),
            secure_note: cipher.secure_note.as_ref().map(Into::into),
            card: cipher.card.as_ref().map(|c| c.decrypt_lossy(&d)),
            identity: cipher.identity.as_ref().map(|i| i.decrypt_lossy(&d)),
            fields: cipher
                .fields
                .as_ref()
                .map(|fields| fields.iter().map(|f| f.decrypt_lossy(&d)).collect()),
            favorite: cipher.favorite,
            revision_date: cipher.revision_date,
            deleted_date: cipher.deleted_date,
        }
    }

    /// Decrypt raw vault records, skipping the ones that fail entirely.
    ///
    /// A record fails when it does not parse as a [Cipher], including a malformed [EncString] in
    /// any field. Failures never abort the batch.
    pub fn decrypt_batch(&self, records: &[Value]) -> DecryptCipherListResult {
        let mut result = DecryptCipherListResult::default();

        for record in records {
            match self.decrypt_record(record) {
                Ok(view) => result.successes.push(view),
                Err(reason) => {
                    let id = record.get("id").and_then(Value::as_str).map(str::to_owned);
                    warn!(id = id.as_deref().unwrap_or("<none>"), %reason, "skipping vault item");
                    result.failures.push(CipherFailure { id, reason });
                }
            }
        }

        debug!(
            successes = result.successes.len(),
            failures = result.failures.len(),
            "decrypted vault items"
        );
        result
    }

    fn decrypt_record(&self, record: &Value) -> Result<CipherView, String> {
        let cipher = Cipher::deserialize(record)
            .map_err(VaultParseError::from)
            .map_err(|e| e.to_string())?;
        Ok(self.decrypt_item(&cipher))
    }
}

/// Decrypts the fields of a single item, substituting [DECRYPT_ERROR_MARKER] on failure.
pub(crate) struct FieldDecryptor<'a> {
    key: &'a VaultKeyHandle,
    cipher_id: Uuid,
}

impl FieldDecryptor<'_> {
    pub(crate) fn decrypt(&self, field: &'static str, value: &Option<EncString>) -> Option<String> {
        value
            .as_ref()
            .map(|value| self.decrypt_required(field, value))
    }

    pub(crate) fn decrypt_required(&self, field: &'static str, value: &EncString) -> String {
        match self.key.decrypt::<EncString, String>(value) {
            Ok(plain) => plain,
            Err(error) => {
                warn!(cipher_id = %self.cipher_id, field, %error, "field could not be decrypted");
                DECRYPT_ERROR_MARKER.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vaultkeep_crypto::{CryptoError, KeyEncryptable, SymmetricCryptoKey};

    use super::*;
    use crate::CipherType;

    fn enc(value: &str, key: &SymmetricCryptoKey) -> String {
        value.encrypt_with_key(key).unwrap().to_string()
    }

    fn login_record(id: u8, name: &str, key: &SymmetricCryptoKey) -> Value {
        json!({
            "id": format!("00000000-0000-4000-8000-0000000000{id:02x}"),
            "type": 1,
            "name": enc(name, key),
            "notes": enc("some notes", key),
            "login": {
                "username": enc("octocat", key),
                "password": enc("hunter2", key),
                "uris": [{ "uri": enc("https://github.com", key), "match": 0 }],
            },
            "fields": [{ "name": enc("pin", key), "value": enc("1234", key), "type": 1 }],
        })
    }

    #[test]
    fn test_decrypt_field() {
        let key = SymmetricCryptoKey::generate();
        let text = enc("hello", &key);
        let handle = VaultKeyHandle::new(key);
        let service = VaultCryptoService::new(&handle);

        assert_eq!(service.decrypt_field(Some(&text)).unwrap(), "hello");
        assert_eq!(service.decrypt_field(Some("")).unwrap(), "");
        assert_eq!(service.decrypt_field(None).unwrap(), "");
        assert!(matches!(
            service.decrypt_field(Some("not an enc string")),
            Err(DecryptError::Crypto(CryptoError::Format(_)))
        ));
    }

    #[test]
    fn test_decrypt_field_with_wrong_key() {
        let text = enc("hello", &SymmetricCryptoKey::generate());
        let handle = VaultKeyHandle::new(SymmetricCryptoKey::generate());

        let result = VaultCryptoService::new(&handle).decrypt_field(Some(&text));
        assert!(matches!(
            result,
            Err(DecryptError::Crypto(CryptoError::AuthenticationFailed))
        ));
    }

    #[test]
    fn test_decrypt_item() {
        let key = SymmetricCryptoKey::generate();
        let cipher: Cipher = serde_json::from_value(login_record(1, "GitHub", &key)).unwrap();
        let handle = VaultKeyHandle::new(key);

        let view = VaultCryptoService::new(&handle).decrypt_item(&cipher);

        assert_eq!(view.r#type, CipherType::Login);
        assert_eq!(view.name, "GitHub");
        assert_eq!(view.notes.as_deref(), Some("some notes"));
        let login = view.login.unwrap();
        assert_eq!(login.username.as_deref(), Some("octocat"));
        assert_eq!(login.password.as_deref(), Some("hunter2"));
        assert_eq!(
            login.uris.unwrap()[0].uri.as_deref(),
            Some("https://github.com")
        );
        let fields = view.fields.unwrap();
        assert_eq!(fields[0].name.as_deref(), Some("pin"));
        assert_eq!(fields[0].value.as_deref(), Some("1234"));
    }

    #[test]
    fn test_field_failure_does_not_abort_item() {
        let key = SymmetricCryptoKey::generate();
        let other = SymmetricCryptoKey::generate();
        let mut record = login_record(1, "GitHub", &key);
        record["notes"] = json!(enc("foreign", &other));
        record["login"]["password"] = json!(enc("foreign", &other));

        let cipher: Cipher = serde_json::from_value(record).unwrap();
        let handle = VaultKeyHandle::new(key);
        let view = VaultCryptoService::new(&handle).decrypt_item(&cipher);

        assert_eq!(view.name, "GitHub");
        assert_eq!(view.notes.as_deref(), Some(DECRYPT_ERROR_MARKER));
        let login = view.login.unwrap();
        assert_eq!(login.password.as_deref(), Some(DECRYPT_ERROR_MARKER));
        assert_eq!(login.username.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_undecryptable_name_keeps_other_fields() {
        let key = SymmetricCryptoKey::generate();
        let mut record = login_record(1, "GitHub", &key);
        record["name"] = json!(enc("GitHub", &SymmetricCryptoKey::generate()));

        let cipher: Cipher = serde_json::from_value(record.clone()).unwrap();
        let handle = VaultKeyHandle::new(key);
        let service = VaultCryptoService::new(&handle);
        let view = service.decrypt_item(&cipher);

        assert_eq!(view.name, DECRYPT_ERROR_MARKER);
        assert_eq!(view.notes.as_deref(), Some("some notes"));
        assert_eq!(view.login.unwrap().password.as_deref(), Some("hunter2"));

        let result = service.decrypt_batch(&[record]);
        assert!(result.failures.is_empty());
        assert_eq!(result.successes[0].name, DECRYPT_ERROR_MARKER);
        assert_eq!(result.successes[0].notes.as_deref(), Some("some notes"));
    }

    #[test]
    fn test_batch_skips_corrupted_record() {
        let key = SymmetricCryptoKey::generate();
        let mut records: Vec<Value> = (0..5)
            .map(|i| login_record(i, &format!("item {i}"), &key))
            .collect();

        // Truncate the name's MAC.
        let name = records[2]["name"].as_str().unwrap().to_owned();
        let (head, _) = name.rsplit_once('|').unwrap();
        records[2]["name"] = json!(format!("{head}|AAAA"));

        let handle = VaultKeyHandle::new(key);
        let result = VaultCryptoService::new(&handle).decrypt_batch(&records);

        let names: Vec<_> = result.successes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["item 0", "item 1", "item 3", "item 4"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(
            result.failures[0].id.as_deref(),
            Some("00000000-0000-4000-8000-000000000002")
        );
    }

    #[test]
    fn test_batch_skips_malformed_records() {
        let key = SymmetricCryptoKey::generate();
        let good = login_record(0, "good", &key);
        let mut malformed = login_record(1, "bad", &key);
        malformed["login"]["username"] = json!("2.%%%|%%%|%%%");
        let no_id = json!({ "type": 1, "name": enc("no id", &key) });

        let handle = VaultKeyHandle::new(key);
        let result =
            VaultCryptoService::new(&handle).decrypt_batch(&[good, malformed, no_id, json!(42)]);

        assert_eq!(result.successes.len(), 1);
        assert_eq!(result.successes[0].name, "good");
        let ids: Vec<_> = result.failures.iter().map(|f| f.id.clone()).collect();
        assert_eq!(
            ids,
            [
                Some("00000000-0000-4000-8000-000000000001".to_owned()),
                None,
                None
            ]
        );
    }
}
