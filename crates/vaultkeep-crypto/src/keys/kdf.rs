use std::{num::NonZeroU32, pin::Pin};

use aes::cipher::typenum::U32;
use generic_array::GenericArray;
use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::{util, CryptoError, Result};

/// Key Derivation Function for an account
///
/// Accounts can use multiple KDFs to derive their master key from their password. This Enum
/// represents all the possible KDFs. The parameters always come from the server, the defaults
/// below only document what the server hands out for new accounts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub enum Kdf {
    PBKDF2 {
        iterations: NonZeroU32,
    },
    Argon2id {
        iterations: NonZeroU32,
        /// Memory in MiB
        memory: NonZeroU32,
        parallelism: NonZeroU32,
    },
}

impl Default for Kdf {
    /// Default KDF for new accounts.
    fn default() -> Self {
        Kdf::PBKDF2 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

/// Default PBKDF2 iterations
pub const DEFAULT_PBKDF2_ITERATIONS: NonZeroU32 = non_zero(600_000);
/// Default Argon2 iterations
pub const DEFAULT_ARGON2_ITERATIONS: NonZeroU32 = non_zero(3);
/// Default Argon2 memory in MiB
pub const DEFAULT_ARGON2_MEMORY: NonZeroU32 = non_zero(64);
/// Default Argon2 parallelism
pub const DEFAULT_ARGON2_PARALLELISM: NonZeroU32 = non_zero(4);

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("KDF defaults must be non-zero"),
    }
}

const PBKDF2_MIN_ITERATIONS: u32 = 5000;
const ARGON2ID_MIN_ITERATIONS: u32 = 2;
const ARGON2ID_MEMORY_MIB: std::ops::RangeInclusive<u32> = 16..=1024;
const ARGON2ID_PARALLELISM: std::ops::RangeInclusive<u32> = 1..=16;

impl Kdf {
    /// Reject parameters weaker than any server would issue.
    pub fn validate(&self) -> Result<()> {
        let valid = match self {
            Kdf::PBKDF2 { iterations } => iterations.get() >= PBKDF2_MIN_ITERATIONS,
            Kdf::Argon2id {
                iterations,
                memory,
                parallelism,
            } => {
                iterations.get() >= ARGON2ID_MIN_ITERATIONS
                    && ARGON2ID_MEMORY_MIB.contains(&memory.get())
                    && ARGON2ID_PARALLELISM.contains(&parallelism.get())
            }
        };

        if valid {
            Ok(())
        } else {
            Err(CryptoError::InsufficientKdfParameters)
        }
    }
}

/// Derive a 32 byte key from a secret and salt using the given KDF.
pub(super) fn derive_kdf_key(
    secret: &[u8],
    salt: &[u8],
    kdf: &Kdf,
) -> Result<Pin<Box<GenericArray<u8, U32>>>> {
    kdf.validate()?;

    let hash = match kdf {
        Kdf::PBKDF2 { iterations } => util::pbkdf2(secret, salt, iterations.get())?,
        Kdf::Argon2id {
            iterations,
            memory,
            parallelism,
        } => {
            use argon2::*;

            let params = Params::new(
                memory.get() * 1024, // Convert MiB to KiB
                iterations.get(),
                parallelism.get(),
                Some(32),
            )?;
            let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

            let salt_sha = sha2::Sha256::new().chain_update(salt).finalize();

            let mut hash = [0u8; 32];
            argon.hash_password_into(secret, &salt_sha, &mut hash)?;
            hash
        }
    };

    let mut key = Box::pin(GenericArray::<u8, U32>::default());
    key.copy_from_slice(&hash);
    Ok(key)
}
