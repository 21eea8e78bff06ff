use clap::{Arg, ArgAction, ArgMatches, Command};
use folio::{ValidationPolicy, Validator};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("check")
        .about("Validate every article in the workspace")
        .arg(
            Arg::new("preview")
                .long("preview")
                .action(ArgAction::SetTrue)
                .conflicts_with("strict")
                .help("Report violations without failing (local preview)."),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on any error-severity violation (CI). Overrides validation.mode."),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let policy = if matches.get_flag("preview") {
        ValidationPolicy::Preview
    } else if matches.get_flag("strict") {
        ValidationPolicy::Strict
    } else {
        session.config.validation.mode
    };

    let report = Validator::from_config(&session.config).check(&session.registry);
    let fatal = report.is_fatal(policy);
    if fatal {
        tracing::warn!(errors = report.error_count(), "content failed validation");
    }

    Ok(CommandResult::Check {
        policy,
        fatal,
        report,
    })
}
