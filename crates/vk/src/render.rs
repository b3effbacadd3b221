use clap::ValueEnum;
use color_eyre::eyre::{eyre, Result};
use vaultkeep_cli::Color;

use crate::command::Cli;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub(crate) enum Output {
    JSON,
    YAML,
    None,
}

impl Output {
    /// Serialize an object in this format. Returns `None` for [Output::None].
    ///
    /// Both formats end with a single newline.
    fn serialize(self, value: &dyn erased_serde::Serialize) -> Result<Option<String>> {
        Ok(match self {
            Output::JSON => {
                let mut json = serde_json::to_string_pretty(value)?;
                json.push('\n');
                Some(json)
            }
            Output::YAML => Some(serde_yaml::to_string(value)?),
            Output::None => None,
        })
    }

    fn syntax(self) -> &'static str {
        match self {
            Output::JSON => "json",
            Output::YAML => "yaml",
            Output::None => "txt",
        }
    }
}

/// What a command hands back to be printed.
pub enum CommandOutput {
    /// Status messages and session keys, printed as is.
    Plain(String),
    /// Structured data, printed in the selected [Output] format.
    Object(Box<dyn erased_serde::Serialize>),
}
pub type CommandResult = Result<CommandOutput>;

impl CommandOutput {
    pub fn object(value: impl serde::Serialize + 'static) -> Self {
        CommandOutput::Object(Box::new(value))
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Plain(text.to_owned())
    }
}
impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Plain(text)
    }
}
impl From<()> for CommandOutput {
    fn from(_: ()) -> Self {
        CommandOutput::Plain(String::new())
    }
}

pub struct RenderConfig {
    output: Output,
    color: Color,
    silent: bool,
}

impl RenderConfig {
    pub fn new(cli: &Cli) -> Self {
        Self {
            output: cli.output,
            color: cli.color,
            silent: cli.quiet || cli.cleanexit || cli.output == Output::None,
        }
    }

    /// Print a successful result to stdout. Errors are returned untouched, `main` reports them.
    pub fn render_result(&self, result: CommandResult) -> Result<()> {
        let output = result?;
        if self.silent {
            return Ok(());
        }

        match output {
            CommandOutput::Plain(text) if text.is_empty() => Ok(()),
            CommandOutput::Plain(text) => {
                println!("{text}");
                Ok(())
            }
            CommandOutput::Object(obj) => match self.output.serialize(&*obj)? {
                Some(text) => self.print_highlighted(&text),
                None => Ok(()),
            },
        }
    }

    fn print_highlighted(&self, text: &str) -> Result<()> {
        if !self.color.is_enabled() {
            print!("{text}");
            return Ok(());
        }

        bat::PrettyPrinter::new()
            .input_from_bytes(text.as_bytes())
            .language(self.output.syntax())
            .print()
            .map_err(|e| eyre!("failed to render output: {e}"))?;
        Ok(())
    }
}
