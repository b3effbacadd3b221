use tracing::warn;
use vaultkeep_vault::{CipherView, VaultCryptoService};

use super::{ListCommands, ListItemsArgs};
use crate::{
    key_management::require_vault_key,
    platform::AppState,
    render::{CommandOutput, CommandResult},
};

pub(crate) fn list(
    state: &AppState,
    session: Option<String>,
    command: ListCommands,
) -> CommandResult {
    match command {
        ListCommands::Items(options) => list_items(state, session, options),
    }
}

fn list_items(state: &AppState, session: Option<String>, options: ListItemsArgs) -> CommandResult {
    let vault_key = require_vault_key(state, session)?;
    let records = state.ciphers(state.active_user()?).list()?;

    let result = VaultCryptoService::new(&vault_key).decrypt_batch(&records);
    if !result.failures.is_empty() {
        warn!(
            count = result.failures.len(),
            "some vault items could not be decrypted and were skipped"
        );
    }

    let mut cipher_views = result.successes;
    cipher_views.retain(|item| matches(item, &options));

    // Sort by name for consistent output
    cipher_views.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(CommandOutput::object(cipher_views))
}

fn matches(item: &CipherView, options: &ListItemsArgs) -> bool {
    // Filter by trash status
    if item.is_deleted() != options.trash {
        return false;
    }

    // Filter by folder
    if let Some(folder_id) = &options.folderid {
        let matches_folder = match item.folder_id {
            None => folder_id == "null",
            Some(id) => id.to_string().eq_ignore_ascii_case(folder_id),
        };
        if !matches_folder {
            return false;
        }
    }

    options
        .search
        .as_deref()
        .is_none_or(|term| item.matches_search(term))
}
