use std::path::Path;

use color_eyre::eyre::WrapErr;
use vaultkeep_vault::SyncResponse;

use crate::{platform::AppState, render::CommandResult};

/// Store the vault items of a sync response for the active account.
///
/// The items stay encrypted, no session is needed.
pub(crate) fn sync(state: &AppState, file: &Path) -> CommandResult {
    let user_id = state.active_user()?;

    let payload =
        std::fs::read(file).wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let response = SyncResponse::parse(&payload)?;
    let count = state.ciphers(user_id).replace(response)?;

    Ok(format!("Syncing complete. {count} items stored.").into())
}
