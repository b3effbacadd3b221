use serde::Deserialize;
use vaultkeep_crypto::Kdf;

use super::{kdf_from_parts, IdentityResponseError, KdfType};
use crate::require;

/// Response to a prelogin request, carrying the KDF parameters for an email address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloginResponse {
    #[serde(alias = "Kdf")]
    pub kdf: Option<KdfType>,
    #[serde(alias = "KdfIterations")]
    pub kdf_iterations: Option<i64>,
    #[serde(alias = "KdfMemory")]
    pub kdf_memory: Option<i64>,
    #[serde(alias = "KdfParallelism")]
    pub kdf_parallelism: Option<i64>,
}

/// Extract the [Kdf] from a prelogin response.
pub fn parse_prelogin(response: PreloginResponse) -> Result<Kdf, IdentityResponseError> {
    let kdf = require!(response.kdf);

    kdf_from_parts(
        kdf,
        response.kdf_iterations,
        response.kdf_memory,
        response.kdf_parallelism,
    )
}
