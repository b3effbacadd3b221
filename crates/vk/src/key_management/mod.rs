use std::fs;

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use tracing::debug;
use vaultkeep_cli::password_prompt_when_none;
use vaultkeep_crypto::MasterKey;

use crate::{
    command::{PasswordSource, UnlockArgs},
    platform::AppState,
    render::CommandResult,
};

mod session;

pub(crate) use session::{require_vault_key, session_output};

pub(crate) fn unlock(state: &AppState, args: UnlockArgs, nointeraction: bool) -> CommandResult {
    let params = state.manager.kdf_for_unlock()?;
    let password = read_password(args.password, &args.source, nointeraction)?;

    let master_key = MasterKey::derive(&password, &params.email, &params.kdf)?;
    let token = state.manager.unlock(&master_key)?;

    Ok(session_output(&token, args.raw, "Your vault is now unlocked!"))
}

pub(crate) fn lock(state: &AppState) -> CommandResult {
    state.manager.lock();
    Ok("Your vault is locked.".into())
}

/// Resolve the master password from, in order: the argument, `--passwordenv`, `--passwordfile`
/// or an interactive prompt.
pub(crate) fn read_password(
    password: Option<String>,
    source: &PasswordSource,
    nointeraction: bool,
) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    if let Some(var) = &source.passwordenv {
        debug!(%var, "reading password from environment");
        return std::env::var(var).map_err(|_| eyre!("Environment variable {var} is not set"));
    }

    if let Some(path) = &source.passwordfile {
        debug!(path = %path.display(), "reading password from file");
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        return Ok(contents.lines().next().unwrap_or_default().to_owned());
    }

    if nointeraction {
        bail!("Master password is required.");
    }

    Ok(password_prompt_when_none("Master password", None)?)
}
