mod key_encryptable;
pub use key_encryptable::{CryptoKey, KeyDecryptable, KeyEncryptable};
mod master_key;
pub use master_key::MasterKey;
mod symmetric_crypto_key;
pub use symmetric_crypto_key::{KeyEncoding, SymmetricCryptoKey};
mod kdf;
pub use kdf::{
    Kdf, DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_PBKDF2_ITERATIONS,
};
