use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vaultkeep_cli::Color;

use crate::{
    auth::LoginArgs,
    render::Output,
    vault::{GetCommands, ListCommands},
};

pub const SESSION_ENV: &str = "VK_SESSION";

#[derive(Parser, Clone)]
#[command(name = "vk", version, about = "vaultkeep CLI", long_about = None, disable_version_flag = true)]
pub struct Cli {
    // Optional as a workaround for https://github.com/clap-rs/clap/issues/3572
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'o', long, global = true, value_enum, default_value_t = Output::JSON)]
    pub output: Output,

    #[arg(short = 'c', long, global = true, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    #[arg(
        long,
        global = true,
        env = SESSION_ENV,
        hide_env_values = true,
        help = "The session key used to decrypt your vault data. Can be obtained with `vk login` or `vk unlock`."
    )]
    pub session: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Exit with a success exit code (0) unless an error is thrown."
    )]
    pub cleanexit: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Don't return anything to stdout."
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        help = "Do not prompt for interactive user input."
    )]
    pub nointeraction: bool,

    // Clap uses uppercase V for the short flag by default, but we want lowercase v
    // https://github.com/clap-rs/clap/issues/138
    #[arg(short = 'v', long, action = clap::builder::ArgAction::Version)]
    pub version: (),
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    // Auth commands
    #[command(long_about = "Log into a user account.")]
    Login(LoginArgs),

    #[command(long_about = "Log out of the current user account.")]
    Logout,

    // KM commands
    #[command(long_about = "Lock the vault and destroy active session keys.")]
    Lock,

    #[command(long_about = "Unlock the vault and return a session key.")]
    Unlock(UnlockArgs),

    // Platform commands
    #[command(long_about = "Store the vault items of a sync response for the active account.")]
    Sync {
        #[arg(short = 'f', long, help = "Path to the sync response JSON.")]
        file: PathBuf,
    },

    #[command(long_about = "Base 64 encode stdin.")]
    Encode,

    #[command(long_about = "Generate shell completions.")]
    Completion {
        #[arg(long, help = "The shell to generate completions for.")]
        shell: Option<clap_complete::Shell>,
    },

    #[command(
        long_about = "Show user information and vault status.",
        after_help = r#"Example return value:
  {
    "userEmail": "user@example.com",
    "userId": "00000000-0000-0000-0000-000000000000",
    "status": "locked"
  }

Notes:
  `status` is one of:
    - `unauthenticated` when you are not logged in
    - `locked` when you are logged in and the vault is locked
    - `unlocked` when you are logged in and the vault is unlocked
"#
    )]
    Status,

    // Vault commands
    #[command(long_about = "List an array of objects from the vault.")]
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    #[command(long_about = "Get an object from the vault.")]
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },
}

#[derive(Args, Clone)]
pub struct UnlockArgs {
    pub password: Option<String>,

    #[command(flatten)]
    pub source: PasswordSource,

    #[arg(long, help = "Only return the session key.")]
    pub raw: bool,
}

#[derive(Args, Clone, Default)]
pub struct PasswordSource {
    #[arg(long, help = "Environment variable storing your password.")]
    pub passwordenv: Option<String>,

    #[arg(
        long,
        help = "Path to a file containing your password as its first line."
    )]
    pub passwordfile: Option<PathBuf>,
}
