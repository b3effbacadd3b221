use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use uuid::Uuid;
use vaultkeep_crypto::EncString;

use super::{
    optional_enc_string, Card, CardView, Field, FieldView, Identity, IdentityView, Login,
    LoginView, SecureNote, SecureNoteView,
};

#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CipherType {
    Login = 1,
    SecureNote = 2,
    Card = 3,
    Identity = 4,
}

/// An encrypted vault item as returned by the server.
///
/// Every sensitive field is an independent [EncString] under the vault key. Unknown fields in
/// the record are ignored.
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cipher {
    pub id: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    pub folder_id: Option<Uuid>,

    pub r#type: CipherType,
    pub name: EncString,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub notes: Option<EncString>,

    #[serde(default)]
    pub login: Option<Login>,
    #[serde(default)]
    pub secure_note: Option<SecureNote>,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,

    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub revision_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_date: Option<DateTime<Utc>>,
}

/// A decrypted [Cipher].
///
/// Fields that could not be decrypted hold [DECRYPT_ERROR_MARKER](crate::DECRYPT_ERROR_MARKER).
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CipherView {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub folder_id: Option<Uuid>,

    pub r#type: CipherType,
    pub name: String,
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<LoginView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_note: Option<SecureNoteView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityView>,
    pub fields: Option<Vec<FieldView>>,

    pub favorite: bool,
    pub revision_date: Option<DateTime<Utc>>,
    pub deleted_date: Option<DateTime<Utc>>,
}

impl CipherView {
    /// Whether the item is in the trash.
    pub fn is_deleted(&self) -> bool {
        self.deleted_date.is_some()
    }

    /// Case-insensitive match against the item name and, for logins, the username and URIs.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let contains = |s: &str| s.to_lowercase().contains(&term);

        if contains(&self.name) {
            return true;
        }

        let Some(login) = &self.login else {
            return false;
        };
        login.username.as_deref().is_some_and(contains)
            || login
                .uris
                .iter()
                .flatten()
                .filter_map(|u| u.uri.as_deref())
                .any(contains)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NAME: &str = "2.AAAAAAAAAAAAAAAAAAAAAA==|AAAAAAAAAAAAAAAAAAAAAA==|AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    #[test]
    fn test_parse_login_record() {
        let cipher: Cipher = serde_json::from_value(json!({
            "id": "5a8b3e0e-0000-4000-8000-000000000001",
            "folderId": null,
            "organizationId": null,
            "type": 1,
            "name": NAME,
            "notes": "",
            "login": {
                "username": NAME,
                "password": null,
                "uris": [{ "uri": NAME, "match": null }]
            },
            "favorite": true,
            "revisionDate": "2024-01-02T03:04:05.000Z",
            "deletedDate": null,
            "object": "cipherDetails",
            "edit": true
        }))
        .unwrap();

        assert_eq!(cipher.r#type, CipherType::Login);
        assert!(cipher.notes.is_none());
        assert!(cipher.favorite);
        let login = cipher.login.unwrap();
        assert!(login.username.is_some());
        assert!(login.password.is_none());
        assert_eq!(login.uris.unwrap().len(), 1);
    }

    #[test]
    fn test_name_is_required() {
        let result = serde_json::from_value::<Cipher>(json!({
            "id": "5a8b3e0e-0000-4000-8000-000000000001",
            "type": 2,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<Cipher>(json!({
            "id": "5a8b3e0e-0000-4000-8000-000000000001",
            "type": 9,
            "name": NAME,
        }));
        assert!(result.is_err());
    }

    fn view(name: &str, username: Option<&str>, uri: Option<&str>) -> CipherView {
        CipherView {
            id: Uuid::nil(),
            organization_id: None,
            folder_id: None,
            r#type: CipherType::Login,
            name: name.to_owned(),
            notes: None,
            login: Some(LoginView {
                username: username.map(str::to_owned),
                password: None,
                password_revision_date: None,
                uris: uri.map(|u| {
                    vec![crate::LoginUriView {
                        uri: Some(u.to_owned()),
                        r#match: None,
                    }]
                }),
                totp: None,
            }),
            secure_note: None,
            card: None,
            identity: None,
            fields: None,
            favorite: false,
            revision_date: None,
            deleted_date: None,
        }
    }

    #[test]
    fn test_matches_search() {
        let item = view("GitHub", Some("octocat"), Some("https://github.com"));

        assert!(item.matches_search("git"));
        assert!(item.matches_search("OCTO"));
        assert!(item.matches_search("github.com"));
        assert!(!item.matches_search("gitlab"));
        assert!(!view("Bank", None, None).matches_search("octo"));
    }
}
