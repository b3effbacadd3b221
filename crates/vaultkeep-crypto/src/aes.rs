//! # AES-256-CBC with HMAC-SHA256
//!
//! Low level encrypt-then-MAC operations behind [`EncString`](crate::EncString). Don't use these
//! directly, go through the envelope types instead.
//!
//! Decryption authenticates `iv || data` before the cipher is initialized. Every failure after
//! that point, including bad PKCS7 padding, is reported as
//! [`CryptoError::AuthenticationFailed`] so no padding oracle is exposed.

use aes::cipher::{
    block_padding::Pkcs7, typenum::U32, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use generic_array::GenericArray;
use hmac::Mac;
use subtle::ConstantTimeEq;

use crate::{
    util::{PbkdfSha256Hmac, PBKDF_SHA256_HMAC_OUT_SIZE},
    CryptoError, Result,
};

/// Decrypt using AES-256 in CBC mode, after verifying the HMAC-SHA256 over `iv || data`.
pub(crate) fn decrypt_aes256_hmac(
    iv: &[u8; 16],
    mac: &[u8; 32],
    data: Vec<u8>,
    mac_key: &GenericArray<u8, U32>,
    key: &GenericArray<u8, U32>,
) -> Result<Vec<u8>> {
    let res = generate_mac(mac_key, iv, &data)?;
    if res.ct_ne(mac).into() {
        return Err(CryptoError::AuthenticationFailed);
    }
    decrypt_aes256_internal(iv, data, key)
}

fn decrypt_aes256_internal(
    iv: &[u8; 16],
    mut data: Vec<u8>,
    key: &GenericArray<u8, U32>,
) -> Result<Vec<u8>> {
    let decrypted_len = cbc::Decryptor::<aes::Aes256>::new(key, iv.into())
        .decrypt_padded_mut::<Pkcs7>(&mut data)
        .map_err(|_| CryptoError::AuthenticationFailed)?
        .len();
    data.truncate(decrypted_len);
    Ok(data)
}

/// Encrypt using AES-256 in CBC mode with a fresh random IV, then MAC `iv || data` with
/// HMAC-SHA256.
///
/// Returns `(iv, mac, data)`.
pub(crate) fn encrypt_aes256_hmac(
    data_dec: &[u8],
    mac_key: &GenericArray<u8, U32>,
    key: &GenericArray<u8, U32>,
) -> Result<([u8; 16], [u8; 32], Vec<u8>)> {
    let rng = rand::thread_rng();
    let (iv, data) = encrypt_aes256_internal(rng, data_dec, key);
    let mac = generate_mac(mac_key, &iv, &data)?;

    Ok((iv, mac, data))
}

fn encrypt_aes256_internal(
    mut rng: impl rand::RngCore,
    data_dec: &[u8],
    key: &GenericArray<u8, U32>,
) -> ([u8; 16], Vec<u8>) {
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);
    let data = cbc::Encryptor::<aes::Aes256>::new(key, &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(data_dec);

    (iv, data)
}

fn generate_mac(mac_key: &[u8], iv: &[u8], data: &[u8]) -> Result<[u8; 32]> {
    let mut hmac =
        PbkdfSha256Hmac::new_from_slice(mac_key).map_err(|_| CryptoError::InvalidKeyLength)?;
    hmac.update(iv);
    hmac.update(data);
    let mac: [u8; PBKDF_SHA256_HMAC_OUT_SIZE] = (*hmac.finalize().into_bytes())
        .try_into()
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(mac)
}

#[cfg(test)]
mod tests {
    use aes::cipher::block_padding::NoPadding;
    use generic_array::sequence::GenericSequence;
    use rand::{RngCore, SeedableRng};

    use super::*;

    /// Create a predictable key for tests
    fn generate_generic_array(offset: u8, increment: u8) -> GenericArray<u8, U32> {
        GenericArray::generate(|i| offset + i as u8 * increment)
    }

    /// Create a predictable iv for tests
    fn generate_vec(length: usize, offset: u8, increment: u8) -> Vec<u8> {
        (0..length).map(|i| offset + i as u8 * increment).collect()
    }

    #[test]
    fn test_encrypt_aes256_internal_uses_rng_for_iv() {
        let key = generate_generic_array(0, 1);

        let rng = rand_chacha::ChaCha8Rng::from_seed([0u8; 32]);
        let (iv, data) = encrypt_aes256_internal(rng, "EncryptMe!".as_bytes(), &key);

        let mut expected_iv = [0u8; 16];
        rand_chacha::ChaCha8Rng::from_seed([0u8; 32]).fill_bytes(&mut expected_iv);
        assert_eq!(iv, expected_iv);
        assert_eq!(data.len(), 16);

        let decrypted = decrypt_aes256_internal(&iv, data, &key).unwrap();
        assert_eq!(decrypted, b"EncryptMe!");
    }

    #[test]
    fn test_generate_mac() {
        let mac_key = generate_vec(16, 0, 16);

        let iv = generate_vec(16, 0, 16);
        let data = generate_vec(16, 0, 16);

        let mac = generate_mac(&mac_key, &iv, &data).unwrap();
        let again = generate_mac(&mac_key, &iv, &data).unwrap();
        let other = generate_mac(&mac_key, &data, &iv[..8]).unwrap();

        assert_eq!(mac.len(), 32);
        assert_eq!(mac, again);
        assert_ne!(mac, other);
    }

    #[test]
    fn test_encrypt_decrypt_aes256_hmac() {
        let key = generate_generic_array(0, 1);
        let mac_key = generate_generic_array(32, 1);

        let (iv, mac, data) = encrypt_aes256_hmac(b"EncryptMe!", &mac_key, &key).unwrap();
        let decrypted = decrypt_aes256_hmac(&iv, &mac, data, &mac_key, &key).unwrap();

        assert_eq!(decrypted, b"EncryptMe!");
    }

    #[test]
    fn test_empty_plaintext_is_one_padding_block() {
        let key = generate_generic_array(0, 1);
        let mac_key = generate_generic_array(32, 1);

        let (iv, mac, data) = encrypt_aes256_hmac(&[], &mac_key, &key).unwrap();
        assert_eq!(data.len(), 16);

        let decrypted = decrypt_aes256_hmac(&iv, &mac, data, &mac_key, &key).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_decrypt_rejects_bad_mac_before_decrypting() {
        let key = generate_generic_array(0, 1);
        let mac_key = generate_generic_array(32, 1);

        let (iv, mut mac, data) = encrypt_aes256_hmac(b"EncryptMe!", &mac_key, &key).unwrap();
        mac[0] ^= 1;

        let result = decrypt_aes256_hmac(&iv, &mac, data, &mac_key, &key);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_bad_padding_is_authentication_failure() {
        let key = generate_generic_array(0, 1);
        let mac_key = generate_generic_array(32, 1);
        let iv = [7u8; 16];
        // A block that decrypts to all zeroes, which is never valid PKCS7 padding
        let data = cbc::Encryptor::<aes::Aes256>::new(&key, &iv.into())
            .encrypt_padded_vec_mut::<NoPadding>(&[0u8; 16]);
        let mac = generate_mac(&mac_key, &iv, &data).unwrap();

        let result = decrypt_aes256_hmac(&iv, &mac, data, &mac_key, &key);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }
}
