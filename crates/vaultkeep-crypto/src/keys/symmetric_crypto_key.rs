use std::pin::Pin;

use aes::cipher::typenum::U32;
use base64::{engine::general_purpose::STANDARD, Engine};
use generic_array::GenericArray;
use rand::Rng;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::key_encryptable::CryptoKey;
use crate::CryptoError;

/// The byte layouts a serialized [SymmetricCryptoKey] can take.
///
/// The layout is selected purely from the length of the encoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// 32 bytes of AES-256 key followed by 32 bytes of HMAC-SHA256 key, no framing.
    Legacy64Byte,
}

impl KeyEncoding {
    /// Detect the layout of an encoded key.
    pub fn detect(encoded: &[u8]) -> Result<Self, CryptoError> {
        match encoded.len() {
            SymmetricCryptoKey::LEGACY_64_BYTE_LEN => Ok(KeyEncoding::Legacy64Byte),
            _ => Err(CryptoError::InvalidKeyLength),
        }
    }
}

/// A symmetric encryption key consisting of two 256-bit keys, one for AES-256-CBC encryption
/// and one for the HMAC-SHA256 authentication tag. Used to encrypt and decrypt
/// [`EncString`](crate::EncString).
///
/// Vault keys and session keys share this type.
#[derive(ZeroizeOnDrop, Clone)]
pub struct SymmetricCryptoKey {
    /// Uses a pinned heap data structure, as noted in [Pinned heap data][crate#pinned-heap-data]
    pub(crate) enc_key: Pin<Box<GenericArray<u8, U32>>>,
    /// Uses a pinned heap data structure, as noted in [Pinned heap data][crate#pinned-heap-data]
    pub(crate) mac_key: Pin<Box<GenericArray<u8, U32>>>,
}

impl SymmetricCryptoKey {
    /// Length of the [KeyEncoding::Legacy64Byte] layout.
    pub const LEGACY_64_BYTE_LEN: usize = 64;

    /// Generate a new random [SymmetricCryptoKey]
    pub fn generate() -> Self {
        Self::generate_internal(rand::thread_rng())
    }

    pub(crate) fn generate_internal(mut rng: impl rand::RngCore) -> Self {
        let mut enc_key = Box::pin(GenericArray::<u8, U32>::default());
        let mut mac_key = Box::pin(GenericArray::<u8, U32>::default());

        rng.fill(enc_key.as_mut_slice());
        rng.fill(mac_key.as_mut_slice());

        SymmetricCryptoKey { enc_key, mac_key }
    }

    /// Encode the key as `enc_key || mac_key`.
    pub fn to_encoded(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::LEGACY_64_BYTE_LEN);
        buf.extend_from_slice(&self.enc_key);
        buf.extend_from_slice(&self.mac_key);
        buf
    }

    #[allow(missing_docs)]
    pub fn to_base64(&self) -> String {
        let mut encoded = self.to_encoded();
        let b64 = STANDARD.encode(&encoded);
        encoded.zeroize();
        b64
    }
}

impl ConstantTimeEq for SymmetricCryptoKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.enc_key.ct_eq(&other.enc_key) & self.mac_key.ct_eq(&other.mac_key)
    }
}

impl PartialEq for SymmetricCryptoKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl TryFrom<String> for SymmetricCryptoKey {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SymmetricCryptoKey::try_from(value.as_str())
    }
}

impl TryFrom<&str> for SymmetricCryptoKey {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let b = STANDARD
            .decode(value.trim())
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        SymmetricCryptoKey::try_from(b)
    }
}

impl TryFrom<Vec<u8>> for SymmetricCryptoKey {
    type Error = CryptoError;

    fn try_from(mut value: Vec<u8>) -> Result<Self, Self::Error> {
        SymmetricCryptoKey::try_from(value.as_mut_slice())
    }
}

impl TryFrom<&mut [u8]> for SymmetricCryptoKey {
    type Error = CryptoError;

    /// Note: This function takes the byte slice by mutable reference and will zero out all
    /// the data in it. This is to prevent the key from being left in memory.
    fn try_from(value: &mut [u8]) -> Result<Self, Self::Error> {
        let result = KeyEncoding::detect(value).map(|encoding| match encoding {
            KeyEncoding::Legacy64Byte => {
                let mut enc_key = Box::pin(GenericArray::<u8, U32>::default());
                let mut mac_key = Box::pin(GenericArray::<u8, U32>::default());

                enc_key.copy_from_slice(&value[..32]);
                mac_key.copy_from_slice(&value[32..]);

                SymmetricCryptoKey { enc_key, mac_key }
            }
        });

        value.zeroize();
        result
    }
}

impl CryptoKey for SymmetricCryptoKey {}

// We manually implement these to make sure we don't print any sensitive data
impl std::fmt::Debug for SymmetricCryptoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricCryptoKey").finish()
    }
}
