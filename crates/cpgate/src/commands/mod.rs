//! Command dispatch: bridges CLI args -> proxy / console -> output formatting.

pub mod config_cmd;
pub mod gateways;
pub mod serve;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Serve(args) => serve::handle(&args, global).await,
        Command::Gateways(args) => gateways::handle(args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
    }
}
