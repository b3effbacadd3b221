use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use vaultkeep_crypto::EncString;

use super::optional_enc_string;
use crate::crypto_service::FieldDecryptor;

/// How a [LoginUri] is compared against the page being filled.
#[allow(missing_docs)]
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum UriMatchType {
    Domain = 0,
    Host = 1,
    StartsWith = 2,
    Exact = 3,
    RegularExpression = 4,
    Never = 5,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginUri {
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub uri: Option<EncString>,
    #[serde(default)]
    pub r#match: Option<UriMatchType>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginUriView {
    pub uri: Option<String>,
    pub r#match: Option<UriMatchType>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub username: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub password: Option<EncString>,
    #[serde(default)]
    pub password_revision_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uris: Option<Vec<LoginUri>>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub totp: Option<EncString>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_revision_date: Option<DateTime<Utc>>,
    pub uris: Option<Vec<LoginUriView>>,
    pub totp: Option<String>,
}

impl Login {
    pub(crate) fn decrypt_lossy(&self, d: &FieldDecryptor) -> LoginView {
        LoginView {
            username: d.decrypt("login.username", &self.username),
            password: d.decrypt("login.password", &self.password),
            password_revision_date: self.password_revision_date,
            uris: self.uris.as_ref().map(|uris| {
                uris.iter()
                    .map(|u| LoginUriView {
                        uri: d.decrypt("login.uris.uri", &u.uri),
                        r#match: u.r#match,
                    })
                    .collect()
            }),
            totp: d.decrypt("login.totp", &self.totp),
        }
    }
}
