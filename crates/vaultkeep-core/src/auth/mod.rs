//! Server payload parsing
//!
//! No network requests are made here. The prelogin and identity token responses are parsed from
//! JSON handed in by the caller and turned into the types the key hierarchy consumes.

use std::num::NonZeroU32;

use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;
use vaultkeep_crypto::Kdf;

use crate::MissingFieldError;

mod identity_response;
mod jwt_token;
mod prelogin;

pub use identity_response::{AccountProfile, IdentityTokenSuccessResponse, LoginData, Tokens};
pub use jwt_token::{JwtToken, JwtTokenParseError};
pub use prelogin::{parse_prelogin, PreloginResponse};

/// Errors from interpreting a server response.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum IdentityResponseError {
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    /// The KDF data could not be parsed, because it has an invalid value
    #[error("KDF is malformed")]
    KdfMalformed,
    /// The wrapped encryption key could not be parsed because the encstring is malformed
    #[error("Wrapped encryption key is malformed")]
    EncryptionKeyMalformed,
    #[error("Access token is invalid: {0}")]
    JwtToken(#[from] JwtTokenParseError),
    #[error("Access token subject is not a valid user id: {0}")]
    InvalidUserId(#[from] uuid::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// KDF algorithm identifiers used by the server.
#[derive(Serialize_repr, Deserialize_repr, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum KdfType {
    #[allow(missing_docs)]
    PBKDF2_SHA256 = 0,
    #[allow(missing_docs)]
    Argon2id = 1,
}

fn kdf_parse_nonzero_u32(value: impl TryInto<u32>) -> Result<NonZeroU32, IdentityResponseError> {
    value
        .try_into()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(IdentityResponseError::KdfMalformed)
}

/// Build a [Kdf] from the loose fields the server sends.
///
/// Argon2id requires memory and parallelism, PBKDF2 ignores them.
pub(crate) fn kdf_from_parts(
    kdf: KdfType,
    iterations: Option<i64>,
    memory: Option<i64>,
    parallelism: Option<i64>,
) -> Result<Kdf, IdentityResponseError> {
    use crate::require;

    Ok(match kdf {
        KdfType::PBKDF2_SHA256 => Kdf::PBKDF2 {
            iterations: kdf_parse_nonzero_u32(require!(iterations))?,
        },
        KdfType::Argon2id => Kdf::Argon2id {
            iterations: kdf_parse_nonzero_u32(require!(iterations))?,
            memory: kdf_parse_nonzero_u32(require!(memory))?,
            parallelism: kdf_parse_nonzero_u32(require!(parallelism))?,
        },
    })
}
