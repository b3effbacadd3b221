use std::pin::Pin;

use aes::cipher::typenum::U32;
use generic_array::GenericArray;
use zeroize::ZeroizeOnDrop;

use super::{kdf::derive_kdf_key, KeyDecryptable, Kdf, SymmetricCryptoKey};
use crate::{util::hkdf_expand, EncString, KeyEncryptable, Result};

/// Master Key.
///
/// Derived from the users master password, used to protect the vault key. It is never
/// persisted, and only used long enough to unwrap the vault key during login or unlock.
#[derive(ZeroizeOnDrop)]
pub struct MasterKey(Pin<Box<GenericArray<u8, U32>>>);

impl MasterKey {
    /// Derives a users master key from their password, email and KDF.
    ///
    /// Note: the email is trimmed and converted to lowercase before being used.
    pub fn derive(password: &str, email: &str, kdf: &Kdf) -> Result<Self> {
        derive_kdf_key(
            password.as_bytes(),
            email.trim().to_lowercase().as_bytes(),
            kdf,
        )
        .map(Self)
    }

    /// Stretch the 32 byte master key into a 64 byte [SymmetricCryptoKey] using HKDF-Expand
    /// with the `enc` and `mac` info strings.
    fn stretch(&self) -> Result<SymmetricCryptoKey> {
        let enc_key = hkdf_expand::<U32>(&self.0, Some("enc"))?;
        let mac_key = hkdf_expand::<U32>(&self.0, Some("mac"))?;

        Ok(SymmetricCryptoKey { enc_key, mac_key })
    }

    /// Decrypt the server-wrapped vault key.
    ///
    /// A wrong password shows up here as [`CryptoError::AuthenticationFailed`](crate::CryptoError).
    pub fn decrypt_user_key(&self, user_key: &EncString) -> Result<SymmetricCryptoKey> {
        let stretched = self.stretch()?;
        let mut dec: Vec<u8> = user_key.decrypt_with_key(&stretched)?;
        SymmetricCryptoKey::try_from(dec.as_mut_slice())
    }

    /// Wrap a vault key under this master key, the inverse of [MasterKey::decrypt_user_key].
    pub fn encrypt_user_key(&self, user_key: &SymmetricCryptoKey) -> Result<EncString> {
        let stretched = self.stretch()?;
        user_key.to_encoded().as_slice().encrypt_with_key(&stretched)
    }
}

impl From<[u8; 32]> for MasterKey {
    fn from(value: [u8; 32]) -> Self {
        let mut key = Box::pin(GenericArray::<u8, U32>::default());
        key.copy_from_slice(&value);
        Self(key)
    }
}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey").finish()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::CryptoError;

    fn test_kdf() -> Kdf {
        Kdf::PBKDF2 {
            iterations: NonZeroU32::new(5000).unwrap(),
        }
    }

    #[test]
    fn test_derive_normalizes_email() {
        let a = MasterKey::derive("password", "Test@Example.com ", &test_kdf()).unwrap();
        let b = MasterKey::derive("password", "test@example.com", &test_kdf()).unwrap();

        assert_eq!(a.0.as_slice(), b.0.as_slice());
    }

    #[test]
    fn test_wrap_unwrap_user_key() {
        let master_key = MasterKey::derive("password", "test@example.com", &test_kdf()).unwrap();
        let user_key = SymmetricCryptoKey::generate();

        let wrapped = master_key.encrypt_user_key(&user_key).unwrap();
        let unwrapped = master_key.decrypt_user_key(&wrapped).unwrap();

        assert_eq!(user_key, unwrapped);
    }

    #[test]
    fn test_wrong_password_fails_authentication() {
        let master_key = MasterKey::derive("password", "test@example.com", &test_kdf()).unwrap();
        let wrong = MasterKey::derive("passw0rd", "test@example.com", &test_kdf()).unwrap();
        let wrapped = master_key
            .encrypt_user_key(&SymmetricCryptoKey::generate())
            .unwrap();

        let result = wrong.decrypt_user_key(&wrapped);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_insufficient_kdf_is_rejected() {
        let kdf = Kdf::PBKDF2 {
            iterations: NonZeroU32::new(1).unwrap(),
        };
        let result = MasterKey::derive("password", "test@example.com", &kdf);
        assert!(matches!(result, Err(CryptoError::InsufficientKdfParameters)));
    }

    #[test]
    fn test_unwrapped_key_must_be_64_bytes() {
        let master_key = MasterKey::from([3u8; 32]);
        let short_payload = [9u8; 32]
            .as_slice()
            .encrypt_with_key(&master_key.stretch().unwrap())
            .unwrap();

        let result = master_key.decrypt_user_key(&short_payload);
        assert!(matches!(result, Err(CryptoError::InvalidKeyLength)));
    }
}
