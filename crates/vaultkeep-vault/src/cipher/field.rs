use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use vaultkeep_crypto::EncString;

use super::optional_enc_string;
use crate::crypto_service::FieldDecryptor;

/// Represents the type of a [FieldView].
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldType {
    /// Text field
    Text = 0,
    /// Hidden text field
    Hidden = 1,
    /// Boolean field
    Boolean = 2,
    /// Linked field
    Linked = 3,
}

/// A custom field attached to a cipher.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, deserialize_with = "optional_enc_string")]
    name: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    value: Option<EncString>,
    r#type: FieldType,

    #[serde(default)]
    linked_id: Option<u32>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: Option<String>,
    pub value: Option<String>,
    pub r#type: FieldType,

    pub linked_id: Option<u32>,
}

impl Field {
    pub(crate) fn decrypt_lossy(&self, d: &FieldDecryptor) -> FieldView {
        FieldView {
            name: d.decrypt("fields.name", &self.name),
            value: d.decrypt("fields.value", &self.value),
            r#type: self.r#type,
            linked_id: self.linked_id,
        }
    }
}
