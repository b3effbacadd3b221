use serde::{Deserialize, Serialize};
use vaultkeep_crypto::EncString;

use super::optional_enc_string;
use crate::crypto_service::FieldDecryptor;

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub cardholder_name: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub exp_month: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub exp_year: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub code: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub brand: Option<EncString>,
    #[serde(default, deserialize_with = "optional_enc_string")]
    pub number: Option<EncString>,
}

#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub cardholder_name: Option<String>,
    pub exp_month: Option<String>,
    pub exp_year: Option<String>,
    pub code: Option<String>,
    pub brand: Option<String>,
    pub number: Option<String>,
}

impl Card {
    pub(crate) fn decrypt_lossy(&self, d: &FieldDecryptor) -> CardView {
        CardView {
            cardholder_name: d.decrypt("card.cardholderName", &self.cardholder_name),
            exp_month: d.decrypt("card.expMonth", &self.exp_month),
            exp_year: d.decrypt("card.expYear", &self.exp_year),
            code: d.decrypt("card.code", &self.code),
            brand: d.decrypt("card.brand", &self.brand),
            number: d.decrypt("card.number", &self.number),
        }
    }
}
