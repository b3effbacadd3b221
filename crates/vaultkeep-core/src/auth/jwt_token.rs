use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use thiserror::Error;

/// The payload of the access token issued by the identity server.
///
/// Only the claims used locally are decoded. The signature is not verified, the token is only
/// ever sent back to the server that issued it.
#[allow(missing_docs)]
#[derive(Debug, Deserialize)]
pub struct JwtToken {
    pub exp: u64,
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum JwtTokenParseError {
    #[error("JWT token parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JWT token decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("JWT token has {0} parts, expected 3")]
    InvalidParts(usize),
}

impl FromStr for JwtToken {
    type Err = JwtTokenParseError;

    /// Parses a JWT token from a string.
    ///
    /// **Note:** This function does not validate the token signature.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split('.').collect::<Vec<_>>();
        let [_header, payload, _signature] = parts.as_slice() else {
            return Err(JwtTokenParseError::InvalidParts(parts.len()));
        };

        let decoded = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&decoded)?)
    }
}
