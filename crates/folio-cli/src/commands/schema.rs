use clap::Command;

use crate::commands::CommandResult;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("schema").about("Print the JSON Schema of a content cluster file")
}

pub fn run() -> Result<CommandResult, CliError> {
    let schema = serde_json::to_value(folio::cluster_schema())?;
    Ok(CommandResult::Schema { schema })
}
