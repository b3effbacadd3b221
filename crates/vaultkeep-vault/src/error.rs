use thiserror::Error;

/// Decrypting a single field or the required parts of an item failed.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DecryptError {
    #[error(transparent)]
    Crypto(#[from] vaultkeep_crypto::CryptoError),
}

/// A sync response or stored vault record could not be read.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum VaultParseError {
    #[error(transparent)]
    Crypto(#[from] vaultkeep_crypto::CryptoError),
    #[error(transparent)]
    MissingFieldError(#[from] vaultkeep_core::MissingFieldError),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] vaultkeep_state::settings::SettingsError),
    #[error(transparent)]
    Store(#[from] vaultkeep_state::StoreError),
}

/// No stored vault item has the requested id.
#[derive(Debug, Error)]
#[error("Item does not exist")]
pub struct ItemNotFoundError;
