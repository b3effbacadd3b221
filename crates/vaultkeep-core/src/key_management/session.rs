use std::str::FromStr;

use vaultkeep_crypto::{CryptoError, KeyDecryptable, SymmetricCryptoKey};
use zeroize::ZeroizeOnDrop;

/// The session key, exported as the base64 encoding of its 64 raw bytes.
///
/// The token is the only copy of the session key. It is never persisted, callers pass it back on
/// every vault operation (`vk` reads it from `--session` or `VK_SESSION`).
#[derive(Clone, PartialEq, ZeroizeOnDrop)]
pub struct SessionToken(String);

impl SessionToken {
    pub(crate) fn from_key(key: &SymmetricCryptoKey) -> Self {
        Self(key.to_base64())
    }

    /// Decode the session key, checking its length.
    pub(crate) fn to_key(&self) -> Result<SymmetricCryptoKey, CryptoError> {
        SymmetricCryptoKey::try_from(self.0.as_str())
    }

    /// The token as handed to the user.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_owned()))
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value.trim().to_owned())
    }
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken").finish()
    }
}

/// An unwrapped vault key.
///
/// The key itself cannot be read back out of the handle, it can only be used to decrypt values.
pub struct VaultKeyHandle(SymmetricCryptoKey);

impl VaultKeyHandle {
    /// Wrap an already unwrapped vault key. Normally obtained from
    /// [KeyHierarchyManager::resolve](super::KeyHierarchyManager::resolve).
    pub fn new(key: SymmetricCryptoKey) -> Self {
        Self(key)
    }

    /// Decrypt a value with the vault key.
    pub fn decrypt<T, Output>(&self, value: &T) -> Result<Output, CryptoError>
    where
        T: KeyDecryptable<SymmetricCryptoKey, Output> + ?Sized,
    {
        value.decrypt_with_key(&self.0)
    }
}

impl std::fmt::Debug for VaultKeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKeyHandle").finish()
    }
}
