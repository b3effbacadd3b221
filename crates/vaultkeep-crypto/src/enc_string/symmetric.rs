use std::{fmt::Display, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;

use super::{check_length, from_b64, from_b64_vec, split_enc_string};
use crate::{
    error::{CryptoError, EncStringParseError, Result},
    KeyDecryptable, KeyEncryptable, SymmetricCryptoKey,
};

/// # Encrypted string primitive
///
/// [EncString] is a strongly typed encrypted string representation used by vault records and
/// the local protected storage. It contains the encryption type, the initialization vector, the
/// ciphertext and the MAC over `iv || ciphertext`.
///
/// The only supported variant is `Aes256Cbc_HmacSha256_B64` (type 2). Any other type number
/// is rejected with [CryptoError::UnsupportedCipherType] at parse time.
///
/// ## Serialization
///
/// [EncString] implements [Display] and [FromStr] to allow for easy serialization and uses a
/// custom scheme to represent the different variants.
///
/// The scheme is one of the following schemes:
/// - `[type].[iv]|[data]|[mac]`
///
/// Where:
/// - `[type]`: is a number representing the variant.
/// - `[iv]`: (optional) is the initialization vector used for encryption.
/// - `[data]`: is the encrypted data.
/// - `[mac]`: (optional) is the MAC used to validate the integrity of the data.
///
/// The binary form produced by [EncString::to_buffer] is `[type][iv:16][mac:32][data]`.
#[derive(Clone, zeroize::ZeroizeOnDrop, PartialEq)]
#[allow(unused, non_camel_case_types, missing_docs)]
pub enum EncString {
    /// 2
    Aes256Cbc_HmacSha256_B64 {
        iv: [u8; 16],
        mac: [u8; 32],
        data: Vec<u8>,
    },
}

/// Deserializes an [EncString] from a string.
impl FromStr for EncString {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (enc_type, parts) = split_enc_string(s)?;
        match (enc_type, parts.as_slice()) {
            ("2", [iv, data, mac]) => {
                let iv = from_b64(iv)?;
                let data = from_b64_vec(data)?;
                let mac = from_b64(mac)?;

                Ok(EncString::Aes256Cbc_HmacSha256_B64 { iv, mac, data })
            }
            ("2", parts) => Err(EncStringParseError::InvalidParts {
                enc_type: 2,
                expected: 3,
                got: parts.len(),
            }
            .into()),
            (enc_type, _) => match enc_type.parse::<u8>() {
                Ok(enc_type) => Err(CryptoError::UnsupportedCipherType(enc_type)),
                Err(_) => Err(EncStringParseError::InvalidType(enc_type.to_string()).into()),
            },
        }
    }
}

impl EncString {
    /// Smallest valid binary envelope: one type byte, the IV and the MAC.
    pub const MIN_BUFFER_LEN: usize = 1 + 16 + 32;

    /// Parse the binary form `[type][iv:16][mac:32][data]`.
    pub fn from_buffer(buf: &[u8]) -> Result<Self> {
        let enc_type = *buf.first().ok_or(EncStringParseError::NoType)?;

        match enc_type {
            2 => {
                check_length(buf, Self::MIN_BUFFER_LEN)?;

                let mut iv = [0u8; 16];
                iv.copy_from_slice(&buf[1..17]);
                let mut mac = [0u8; 32];
                mac.copy_from_slice(&buf[17..49]);
                let data = buf[49..].to_vec();

                Ok(EncString::Aes256Cbc_HmacSha256_B64 { iv, mac, data })
            }
            _ => Err(CryptoError::UnsupportedCipherType(enc_type)),
        }
    }

    #[allow(missing_docs)]
    pub fn to_buffer(&self) -> Result<Vec<u8>> {
        let mut buf;

        match self {
            EncString::Aes256Cbc_HmacSha256_B64 { iv, mac, data } => {
                buf = Vec::with_capacity(Self::MIN_BUFFER_LEN + data.len());
                buf.push(self.enc_type());
                buf.extend_from_slice(iv);
                buf.extend_from_slice(mac);
                buf.extend_from_slice(data);
            }
        }

        Ok(buf)
    }

    /// The numeric type tag of the envelope.
    pub const fn enc_type(&self) -> u8 {
        match self {
            EncString::Aes256Cbc_HmacSha256_B64 { .. } => 2,
        }
    }

    /// Encrypt `data_dec` under `key` with a fresh random IV.
    pub fn encrypt(data_dec: &[u8], key: &SymmetricCryptoKey) -> Result<EncString> {
        let (iv, mac, data) =
            crate::aes::encrypt_aes256_hmac(data_dec, &key.mac_key, &key.enc_key)?;
        Ok(EncString::Aes256Cbc_HmacSha256_B64 { iv, mac, data })
    }
}

impl Display for EncString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&[u8]> = match self {
            EncString::Aes256Cbc_HmacSha256_B64 { iv, data, mac } => vec![iv, data, mac],
        };

        let encoded_parts: Vec<String> = parts.iter().map(|part| STANDARD.encode(part)).collect();

        write!(f, "{}.{}", self.enc_type(), encoded_parts.join("|"))?;

        Ok(())
    }
}

impl std::fmt::Debug for EncString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncString::Aes256Cbc_HmacSha256_B64 { data, .. } => f
                .debug_struct("EncString")
                .field("type", &self.enc_type())
                .field("data_len", &data.len())
                .finish(),
        }
    }
}

impl<'de> Deserialize<'de> for EncString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for EncString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl KeyEncryptable<SymmetricCryptoKey, EncString> for &[u8] {
    fn encrypt_with_key(self, key: &SymmetricCryptoKey) -> Result<EncString> {
        EncString::encrypt(self, key)
    }
}

impl KeyDecryptable<SymmetricCryptoKey, Vec<u8>> for EncString {
    fn decrypt_with_key(&self, key: &SymmetricCryptoKey) -> Result<Vec<u8>> {
        match self {
            EncString::Aes256Cbc_HmacSha256_B64 { iv, mac, data } => {
                crate::aes::decrypt_aes256_hmac(iv, mac, data.clone(), &key.mac_key, &key.enc_key)
            }
        }
    }
}

impl KeyEncryptable<SymmetricCryptoKey, EncString> for String {
    fn encrypt_with_key(self, key: &SymmetricCryptoKey) -> Result<EncString> {
        self.as_bytes().encrypt_with_key(key)
    }
}

impl KeyEncryptable<SymmetricCryptoKey, EncString> for &str {
    fn encrypt_with_key(self, key: &SymmetricCryptoKey) -> Result<EncString> {
        self.as_bytes().encrypt_with_key(key)
    }
}

impl KeyDecryptable<SymmetricCryptoKey, String> for EncString {
    fn decrypt_with_key(&self, key: &SymmetricCryptoKey) -> Result<String> {
        let dec: Vec<u8> = self.decrypt_with_key(key)?;
        String::from_utf8(dec).map_err(|_| CryptoError::InvalidUtf8String)
    }
}
