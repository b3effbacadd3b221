#![doc = include_str!("../README.md")]

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use color_eyre::eyre::Result;
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};
use vaultkeep_cli::install_color_eyre;

use crate::{command::*, platform::AppState, render::CommandResult};

mod auth;
mod command;
mod key_management;
mod platform;
mod render;
mod vault;

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    install_color_eyre(cli.color)?;
    let render_config = render::RenderConfig::new(&cli);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    render_config.render_result(process_commands(command, cli.session, cli.nointeraction))
}

/// Logs go to stderr so stdout only carries command output. `RUST_LOG` at runtime wins over
/// `RUST_LOG` at build time, which wins over `info`.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(option_env!("RUST_LOG").unwrap_or("info").parse()?)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn process_commands(
    command: Commands,
    session: Option<String>,
    nointeraction: bool,
) -> CommandResult {
    match command {
        Commands::Login(args) => auth::login(&AppState::open()?, args, nointeraction),
        Commands::Logout => auth::logout(&AppState::open()?),

        Commands::Lock => key_management::lock(&AppState::open()?),
        Commands::Unlock(args) => key_management::unlock(&AppState::open()?, args, nointeraction),

        Commands::Status => platform::status(&AppState::open()?, session),

        Commands::Encode => Ok(STANDARD.encode(std::io::read_to_string(std::io::stdin())?).into()),

        Commands::Completion { shell } => {
            let Some(shell) = shell.or_else(Shell::from_env) else {
                return Ok(
                    "Couldn't autodetect a valid shell. Run `vk completion --help` for more info."
                        .into(),
                );
            };

            clap_complete::generate(shell, &mut Cli::command(), "vk", &mut std::io::stdout());
            Ok(().into())
        }

        Commands::Sync { file } => vault::sync(&AppState::open()?, &file),
        Commands::List { command } => vault::list(&AppState::open()?, session, command),
        Commands::Get { command } => vault::get(&AppState::open()?, session, command),
    }
}
