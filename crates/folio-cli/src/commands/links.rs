use clap::{Arg, ArgMatches, Command};
use folio::LinkGraph;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("links")
        .about("Resolve an article's related links and backlinks")
        .arg(Arg::new("slug").value_name("SLUG").required(true))
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let slug = matches
        .get_one::<String>("slug")
        .map(String::as_str)
        .unwrap_or_default();
    util::validate_slug(slug)?;

    let links = LinkGraph::build(&session.registry).links(slug, &session.config)?;
    Ok(CommandResult::Links { links })
}
