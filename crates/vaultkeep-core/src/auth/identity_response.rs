use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vaultkeep_crypto::{EncString, Kdf};

use super::{kdf_from_parts, IdentityResponseError, JwtToken, KdfType};
use crate::require;

/// Successful response from the identity token endpoint.
///
/// The server has used both PascalCase and camelCase for the key material fields over time, both
/// are accepted.
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct IdentityTokenSuccessResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    #[serde(default)]
    token_type: String,

    #[serde(rename = "key", alias = "Key")]
    pub(crate) key: Option<String>,
    #[serde(rename = "kdf", alias = "Kdf")]
    kdf: Option<KdfType>,
    #[serde(rename = "kdfIterations", alias = "KdfIterations")]
    kdf_iterations: Option<i64>,
    #[serde(rename = "kdfMemory", alias = "KdfMemory")]
    kdf_memory: Option<i64>,
    #[serde(rename = "kdfParallelism", alias = "KdfParallelism")]
    kdf_parallelism: Option<i64>,
}

/// The identity of the account a token response belongs to.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub user_id: Uuid,
    pub email: String,
    pub email_verified: bool,
    pub name: Option<String>,
}

/// Tokens to persist for an account.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp in seconds
    pub expires_on: i64,
}

/// Everything `login` needs from a successful identity response.
#[allow(missing_docs)]
#[derive(Debug)]
pub struct LoginData {
    pub profile: AccountProfile,
    pub kdf: Kdf,
    /// The vault key, wrapped by the server under the stretched master key
    pub user_key: EncString,
    pub tokens: Tokens,
}

impl IdentityTokenSuccessResponse {
    /// Interpret the response, computing the token expiry relative to `now`.
    pub fn into_login_data(self, now: DateTime<Utc>) -> Result<LoginData, IdentityResponseError> {
        let jwt: JwtToken = self.access_token.parse()?;

        let profile = AccountProfile {
            user_id: jwt.sub.parse()?,
            email: require!(jwt.email),
            email_verified: jwt.email_verified,
            name: jwt.name,
        };

        let kdf = kdf_from_parts(
            require!(self.kdf),
            self.kdf_iterations,
            self.kdf_memory,
            self.kdf_parallelism,
        )?;

        let user_key: EncString = require!(self.key.as_deref())
            .parse()
            .map_err(|_| IdentityResponseError::EncryptionKeyMalformed)?;

        let expires_in = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        let tokens = Tokens {
            expires_on: now.timestamp().saturating_add(expires_in),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        };

        Ok(LoginData {
            profile,
            kdf,
            user_key,
            tokens,
        })
    }
}
