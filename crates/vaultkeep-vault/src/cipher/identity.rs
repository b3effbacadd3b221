use serde::{Deserialize, Serialize};
use vaultkeep_crypto::EncString;

use super::optional_enc_string;
use crate::crypto_service::FieldDecryptor;

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub title: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub first_name: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub middle_name: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub last_name: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub address1: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub address2: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub address3: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub city: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub state: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub postal_code: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub country: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub company: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub email: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub phone: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub ssn: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub username: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub passport_number: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub license_number: Option<EncString>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ssn: Option<String>,
    pub username: Option<String>,
    pub passport_number: Option<String>,
    pub license_number: Option<String>,
}

impl Identity {
    pub(crate) fn decrypt_lossy(&self, d: &FieldDecryptor) -> IdentityView {
        IdentityView {
            title: d.decrypt("identity.title", &self.title),
            first_name: d.decrypt("identity.firstName", &self.first_name),
            middle_name: d.decrypt("identity.middleName", &self.middle_name),
            last_name: d.decrypt("identity.lastName", &self.last_name),
            address1: d.decrypt("identity.address1", &self.address1),
            address2: d.decrypt("identity.address2", &self.address2),
            address3: d.decrypt("identity.address3", &self.address3),
            city: d.decrypt("identity.city", &self.city),
            state: d.decrypt("identity.state", &self.state),
            postal_code: d.decrypt("identity.postalCode", &self.postal_code),
            country: d.decrypt("identity.country", &self.country),
            company: d.decrypt("identity.company", &self.company),
            email: d.decrypt("identity.email", &self.email),
            phone: d.decrypt("identity.phone", &self.phone),
            ssn: d.decrypt("identity.ssn", &self.ssn),
            username: d.decrypt("identity.username", &self.username),
            passport_number: d.decrypt("identity.passportNumber", &self.passport_number),
            license_number: d.decrypt("identity.licenseNumber", &self.license_number),
        }
    }
}
