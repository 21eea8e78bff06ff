use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::commands;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "folio";

pub fn run() -> ExitCode {
    init_tracing();
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses arguments, resolves the workspace when the command needs one, and dispatches.
///
/// Returns a `sysexits`-compatible `ExitCode` so CI can gate on content integrity.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let workspace_override = matches.get_one::<String>("workspace").cloned();

    // These two never read a workspace: `init` creates one and `schema` is static.
    let result = match matches.subcommand() {
        Some(("init", sub)) => commands::init::run(workspace_override, sub)?,
        Some(("schema", _)) => commands::schema::run()?,
        _ => {
            let session = CliSession::bootstrap(workspace_override, verbosity)?;
            if session.verbosity.verbose {
                tracing::info!(
                    workspace = %session.workspace.root().display(),
                    config = %session.workspace.config_file().display(),
                    content_dir = %session.content_dir().display(),
                    articles = session.registry.len(),
                    "resolved workspace context"
                );
            }
            dispatch(&session, &matches)?
        }
    };
    emit_result(result, output)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    Command::new(NAME)
        .about("Folio content workspace tool")
        .arg(
            Arg::new("workspace")
                .long("workspace")
                .global(true)
                .value_name("PATH")
                .help("Workspace root. Defaults to the nearest ancestor containing folio.yaml."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit JSON instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log the resolved workspace, content directory and article count."),
        )
        .subcommand_required(true)
        .subcommand(commands::init::command())
        .subcommand(commands::check::command())
        .subcommand(commands::list::command())
        .subcommand(commands::jsonld::command())
        .subcommand(commands::links::command())
        .subcommand(commands::graph::command())
        .subcommand(commands::schema::command())
}

fn dispatch(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("check", sub)) => commands::check::run(session, sub),
        Some(("list", _)) => commands::list::run(session),
        Some(("jsonld", sub)) => commands::jsonld::run(session, sub),
        Some(("links", sub)) => commands::links::run(session, sub),
        Some(("graph", _)) => commands::graph::run(session),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
