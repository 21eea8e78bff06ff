use clap::{Arg, ArgMatches, Command};
use folio::Synthesizer;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::util;

pub fn command() -> Command {
    Command::new("jsonld")
        .about("Print the JSON-LD structured data of an article")
        .arg(Arg::new("slug").value_name("SLUG").required(true))
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let slug = matches
        .get_one::<String>("slug")
        .map(String::as_str)
        .unwrap_or_default();
    util::validate_slug(slug)?;

    let article = session.registry.lookup(slug)?;
    let graph = Synthesizer::new(&session.config)?.build(article);
    Ok(CommandResult::StructuredData {
        slug: article.slug.clone(),
        graph: graph.to_json_value()?,
    })
}
