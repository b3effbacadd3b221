pub(crate) mod card;
pub(crate) mod cipher;
pub(crate) mod field;
pub(crate) mod identity;
pub(crate) mod login;
pub(crate) mod secure_note;

pub use card::{Card, CardView};
pub use cipher::{Cipher, CipherType, CipherView};
pub use field::{Field, FieldType, FieldView};
pub use identity::{Identity, IdentityView};
pub use login::{Login, LoginUri, LoginUriView, LoginView, UriMatchType};
pub use secure_note::{SecureNote, SecureNoteType, SecureNoteView};

use serde::{Deserialize, Deserializer};
use vaultkeep_crypto::EncString;

/// Servers send unset encrypted fields as either `null` or `""`, both mean "no value".
pub(crate) fn optional_enc_string<'de, D>(deserializer: D) -> Result<Option<EncString>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "optional_enc_string")]
        value: Option<EncString>,
    }

    #[test]
    fn test_empty_and_null_are_none() {
        let empty: Holder = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        let null: Holder = serde_json::from_str(r#"{"value": null}"#).unwrap();
        let absent: Holder = serde_json::from_str("{}").unwrap();

        assert!(empty.value.is_none());
        assert!(null.value.is_none());
        assert!(absent.value.is_none());
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result = serde_json::from_str::<Holder>(r#"{"value": "2.not-base64|x|y"}"#);
        assert!(result.is_err());
    }
}
