use std::path::PathBuf;

use clap::Args;

use crate::command::PasswordSource;

mod login;
mod logout;

pub(crate) use login::login;
pub(crate) use logout::logout;

#[derive(Args, Clone)]
pub struct LoginArgs {
    #[arg(short = 'e', long, help = "Email address")]
    pub email: Option<String>,

    #[arg(long, help = "Path to the prelogin response JSON, supplies the KDF settings.")]
    pub prelogin: PathBuf,

    #[arg(long, help = "Path to the identity token response JSON.")]
    pub identity: PathBuf,

    #[command(flatten)]
    pub source: PasswordSource,

    #[arg(long, help = "Only return the session key.")]
    pub raw: bool,
}
