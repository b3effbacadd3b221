use crate::Result;

/// Marker for types that can be used as a key in [KeyEncryptable] and [KeyDecryptable].
pub trait CryptoKey {}

/// An encryption operation that takes the input value and encrypts it into the output value
/// using a key reference.
pub trait KeyEncryptable<Key: CryptoKey, Output> {
    #[allow(missing_docs)]
    fn encrypt_with_key(self, key: &Key) -> Result<Output>;
}

/// A decryption operation that takes the input value and decrypts it into the output value
/// using a key reference. Implementations should generally consist of calling
/// [KeyDecryptable::decrypt_with_key] for all the fields of the type.
pub trait KeyDecryptable<Key: CryptoKey, Output> {
    #[allow(missing_docs)]
    fn decrypt_with_key(&self, key: &Key) -> Result<Output>;
}

impl<T: KeyEncryptable<Key, Output>, Key: CryptoKey, Output> KeyEncryptable<Key, Option<Output>>
    for Option<T>
{
    fn encrypt_with_key(self, key: &Key) -> Result<Option<Output>> {
        self.map(|e| e.encrypt_with_key(key)).transpose()
    }
}

impl<T: KeyDecryptable<Key, Output>, Key: CryptoKey, Output> KeyDecryptable<Key, Option<Output>>
    for Option<T>
{
    fn decrypt_with_key(&self, key: &Key) -> Result<Option<Output>> {
        self.as_ref().map(|e| e.decrypt_with_key(key)).transpose()
    }
}

impl<T: KeyEncryptable<Key, Output>, Key: CryptoKey, Output> KeyEncryptable<Key, Vec<Output>>
    for Vec<T>
{
    fn encrypt_with_key(self, key: &Key) -> Result<Vec<Output>> {
        self.into_iter().map(|e| e.encrypt_with_key(key)).collect()
    }
}

impl<T: KeyDecryptable<Key, Output>, Key: CryptoKey, Output> KeyDecryptable<Key, Vec<Output>>
    for Vec<T>
{
    fn decrypt_with_key(&self, key: &Key) -> Result<Vec<Output>> {
        self.iter().map(|e| e.decrypt_with_key(key)).collect()
    }
}
