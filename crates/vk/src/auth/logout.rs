use tracing::info;

use crate::{platform::AppState, render::CommandResult};

pub(crate) fn logout(state: &AppState) -> CommandResult {
    let user_id = state.active_user()?;

    // The logout below flushes this together with the rest of the account's state.
    state.ciphers(user_id).clear()?;
    state.manager.logout()?;

    info!(%user_id, "Logged out successfully");
    Ok("You have logged out.".into())
}
