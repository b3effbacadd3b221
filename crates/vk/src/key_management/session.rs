//! Session token handling on the CLI side.
//!
//! The token is printed once by `login` and `unlock`, and read back from `--session` or
//! `VK_SESSION` by every command that needs the vault key.

use color_eyre::eyre::{bail, Result};
use vaultkeep_core::key_management::{SessionToken, VaultKeyHandle};

use crate::{
    command::SESSION_ENV,
    platform::AppState,
    render::{CommandOutput, CommandResult},
};

/// Resolve the session passed on the command line to the vault key of the active account.
pub(crate) fn require_vault_key(
    state: &AppState,
    session: Option<String>,
) -> Result<VaultKeyHandle> {
    let Some(session) = session.filter(|s| !s.trim().is_empty()) else {
        state.active_user()?;
        bail!(
            "Vault is locked. Run `vk unlock` and pass the session key with --session or \
             {SESSION_ENV}."
        );
    };

    Ok(state.manager.resolve(&SessionToken::from(session))?)
}

pub(crate) fn session_output(token: &SessionToken, raw: bool, headline: &str) -> CommandOutput {
    let session = token.as_str();
    if raw {
        return session.into();
    }

    format!(
        "{headline}\n\n\
        To unlock your vault, set the {SESSION_ENV} environment variable:\n\
        $ export {SESSION_ENV}=\"{session}\"\n\n\
        or pass it as an argument:\n\
        $ vk list items --session {session}"
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output_is_only_the_token() {
        let token = SessionToken::from("c2Vzc2lvbg==".to_owned());

        let CommandOutput::Plain(raw) = session_output(&token, true, "Unlocked") else {
            panic!("expected plain output");
        };
        assert_eq!(raw, "c2Vzc2lvbg==");

        let CommandOutput::Plain(full) = session_output(&token, false, "Unlocked") else {
            panic!("expected plain output");
        };
        assert!(full.starts_with("Unlocked\n"));
        assert!(full.contains("export VK_SESSION=\"c2Vzc2lvbg==\""));
    }
}
