use vaultkeep_vault::{Cipher, ItemNotFoundError, VaultCryptoService, VaultParseError};

use super::GetCommands;
use crate::{
    key_management::require_vault_key,
    platform::AppState,
    render::{CommandOutput, CommandResult},
};

pub(crate) fn get(
    state: &AppState,
    session: Option<String>,
    command: GetCommands,
) -> CommandResult {
    match command {
        GetCommands::Item { id } => get_item(state, session, &id),
    }
}

fn get_item(state: &AppState, session: Option<String>, id: &str) -> CommandResult {
    let vault_key = require_vault_key(state, session)?;

    let record = state
        .ciphers(state.active_user()?)
        .find(id)?
        .ok_or(ItemNotFoundError)?;
    let cipher: Cipher = serde_json::from_value(record).map_err(VaultParseError::from)?;
    let view = VaultCryptoService::new(&vault_key).decrypt_item(&cipher);

    Ok(CommandOutput::object(view))
}
