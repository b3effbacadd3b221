use chrono::Utc;
use color_eyre::eyre::{bail, Result};
use tracing::{debug, info};
use vaultkeep_cli::text_prompt_when_none;
use vaultkeep_core::auth::{parse_prelogin, IdentityTokenSuccessResponse, PreloginResponse};
use vaultkeep_crypto::MasterKey;

use super::LoginArgs;
use crate::{
    key_management::{read_password, session_output},
    platform::{read_json, AppState},
    render::CommandResult,
};

pub(crate) fn login(state: &AppState, args: LoginArgs, nointeraction: bool) -> CommandResult {
    let email = read_email(args.email, nointeraction)?;

    let prelogin: PreloginResponse = read_json(&args.prelogin)?;
    let kdf = parse_prelogin(prelogin)?;
    debug!(?kdf, "prelogin");

    let identity: IdentityTokenSuccessResponse = read_json(&args.identity)?;
    let login = identity.into_login_data(Utc::now())?;

    if login.kdf != kdf {
        bail!("The KDF settings of the identity response do not match the prelogin response");
    }
    if !login.profile.email.eq_ignore_ascii_case(email.trim()) {
        bail!(
            "The identity response belongs to {}, not {}",
            login.profile.email,
            email.trim()
        );
    }

    let password = read_password(None, &args.source, nointeraction)?;
    let master_key = MasterKey::derive(&password, &email, &kdf)?;
    let token = state.manager.login(&master_key, &login)?;

    info!(user_id = %login.profile.user_id, "login complete");
    Ok(session_output(&token, args.raw, "You are logged in!"))
}

fn read_email(email: Option<String>, nointeraction: bool) -> Result<String> {
    if email.is_none() && nointeraction {
        bail!("Email address is required.");
    }
    Ok(text_prompt_when_none("Email address", email)?)
}
