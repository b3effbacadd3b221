use serde::Serialize;
use uuid::Uuid;
use vaultkeep_core::key_management::{SessionToken, VaultStatus};

use super::AppState;
use crate::render::{CommandOutput, CommandResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    user_email: Option<String>,
    user_id: Option<Uuid>,
    status: &'static str,
}

impl From<VaultStatus> for StatusOutput {
    fn from(status: VaultStatus) -> Self {
        match status {
            VaultStatus::LoggedOut => StatusOutput {
                user_email: None,
                user_id: None,
                status: "unauthenticated",
            },
            VaultStatus::Locked { user_id, email } => StatusOutput {
                user_email: Some(email),
                user_id: Some(user_id),
                status: "locked",
            },
            VaultStatus::Unlocked { user_id, email } => StatusOutput {
                user_email: Some(email),
                user_id: Some(user_id),
                status: "unlocked",
            },
        }
    }
}

pub(crate) fn status(state: &AppState, session: Option<String>) -> CommandResult {
    let token = session.map(SessionToken::from);
    let status = state.manager.status(token.as_ref())?;

    Ok(CommandOutput::object(StatusOutput::from(status)))
}
