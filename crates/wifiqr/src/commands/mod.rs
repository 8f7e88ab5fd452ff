//! Command dispatch: bridges CLI args -> core generator -> output formatting.

pub mod config_cmd;
pub mod export;
pub mod form;
pub mod generate;
pub mod parse;
pub mod util;

use clap::CommandFactory;

use crate::cli::{Cli, Command, CompletionsArgs, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    tracing::debug!(command = ?cmd, "dispatching command");
    match cmd {
        Command::Generate(args) => generate::handle(&args, global),
        Command::Export(args) => export::handle(&args, global),
        Command::Parse(args) => parse::handle(&args, global),
        Command::Form => form::handle(global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }
    }
}

fn completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "wifiqr", &mut std::io::stdout());
}
