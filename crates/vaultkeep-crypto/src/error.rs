use thiserror::Error;

/// Errors produced by the cryptographic primitives.
///
/// [`CryptoError::AuthenticationFailed`] deliberately covers a wrong key, a tampered envelope and
/// invalid padding alike. Callers must not try to tell these apart.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key material must be exactly 64 bytes")]
    InvalidKeyLength,
    #[error("Unsupported encryption type {0}")]
    UnsupportedCipherType(u8),
    #[error("Malformed encrypted data, {0}")]
    Format(#[from] EncStringParseError),
    #[error("Decryption failed, the data could not be authenticated")]
    AuthenticationFailed,
    #[error("The decrypted data is not a valid UTF-8 string")]
    InvalidUtf8String,

    #[error("Insufficient KDF parameters")]
    InsufficientKdfParameters,
    #[error("Argon2 error, {0}")]
    Argon(#[from] argon2::Error),
}

/// The reasons an [`EncString`](crate::EncString) can fail to parse.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum EncStringParseError {
    #[error("No type detected, missing '.' separator")]
    NoType,
    #[error("Invalid type, got {0:?}")]
    InvalidType(String),
    #[error("Invalid number of parts for type {enc_type}, expected {expected} got {got}")]
    InvalidParts {
        enc_type: u8,
        expected: usize,
        got: usize,
    },
    #[error("Error decoding base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("Buffer too short: need at least {minimum} bytes, got {got}")]
    BufferTooShort { minimum: usize, got: usize },
}

pub(crate) type Result<T, E = CryptoError> = std::result::Result<T, E>;
