use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SecureNoteType {
    Generic = 0,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SecureNote {
    pub r#type: SecureNoteType,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecureNoteView {
    pub r#type: SecureNoteType,
}

impl From<&SecureNote> for SecureNoteView {
    fn from(note: &SecureNote) -> Self {
        Self {
            r#type: note.r#type,
        }
    }
}
