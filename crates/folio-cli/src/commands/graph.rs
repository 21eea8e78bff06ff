use clap::Command;
use folio::LinkGraph;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("graph").about("Report orphaned articles and related-article cycles")
}

pub fn run(session: &CliSession) -> Result<CommandResult, CliError> {
    let graph = LinkGraph::build(&session.registry);
    Ok(CommandResult::LinkGraph {
        orphans: graph.orphans(),
        cycles: graph.cycles(),
    })
}
