#![doc = include_str!("../README.md")]

mod cipher;
pub use cipher::*;
mod crypto_service;
pub use crypto_service::{
    CipherFailure, DecryptCipherListResult, VaultCryptoService, DECRYPT_ERROR_MARKER,
};
mod error;
pub use error::{DecryptError, ItemNotFoundError, VaultParseError};
mod sync;
pub use sync::{CipherStore, SyncResponse};
