use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use folio::{CONFIG_FILE_NAME, config_file_in};

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};

const STARTER_CONFIG: &str = "\
site:
  name: My Site
  baseUrl: https://www.example.com
  defaultAuthor: Editorial Team
routes:
  articles: /articles/
content:
  dir: content
validation:
  mode: strict
";

const STARTER_CLUSTER_FILE: &str = "getting-started.yaml";

const STARTER_CLUSTER: &str = "\
cluster: getting-started
articles:
  - slug: welcome
    title: Welcome to Folio
    metadata:
      title: Welcome to Folio
      description: A starter article showing the content model.
    category: Guides
    published: 2024-01-01
    tocItems:
      - id: overview
        label: Overview
    sections:
      - id: overview
        title: Overview
        body:
          - type: prose
            text: Replace this article with your own content.
    faqs:
      - question: Where do articles live?
        answer: In YAML or JSON cluster files under the content directory.
";

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a Folio workspace")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Workspace root to initialize. Defaults to the current directory."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Show the resolved workspace root without writing to disk."),
        )
}

pub fn run(
    workspace_override: Option<String>,
    matches: &ArgMatches,
) -> Result<CommandResult, CliError> {
    let positional = matches.get_one::<String>("path").cloned();
    let target = positional
        .or(workspace_override)
        .unwrap_or_else(|| ".".to_string());
    let dry_run = matches.get_flag("dry-run");

    let root = absolutize(&target)?;
    let plan = plan_workspace(&root)?;

    if dry_run {
        return Ok(CommandResult::WorkspaceInitialized {
            root: plan.root.display().to_string(),
            config_file: plan.config_file.display().to_string(),
            created: !plan.already_initialized,
            dry_run: true,
        });
    }

    let created = apply_init(&plan)?;
    Ok(CommandResult::WorkspaceInitialized {
        root: plan.root.display().to_string(),
        config_file: plan.config_file.display().to_string(),
        created,
        dry_run: false,
    })
}

struct InitPlan {
    root: PathBuf,
    config_file: PathBuf,
    already_initialized: bool,
}

fn plan_workspace(root: &Path) -> Result<InitPlan, CliError> {
    if root.exists() && !root.is_dir() {
        return Err(CliError::new(
            format!("workspace root {} is not a directory", root.display()),
            ExitStatus::Usage,
        ));
    }

    let existing_config = config_file_in(root);
    let already_initialized = existing_config.is_some();
    let config_file = existing_config.unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    for ancestor in root.ancestors().skip(1) {
        if let Some(existing) = config_file_in(ancestor) {
            return Err(CliError::new(
                format!(
                    "cannot initialize workspace at {}; ancestor workspace already exists at {}",
                    root.display(),
                    existing.display()
                ),
                ExitStatus::Usage,
            ));
        }
    }

    Ok(InitPlan {
        root: root.to_path_buf(),
        config_file,
        already_initialized,
    })
}

/// Writes the starter config and content. An existing workspace is left untouched.
fn apply_init(plan: &InitPlan) -> Result<bool, CliError> {
    if plan.already_initialized {
        return Ok(false);
    }

    let content_dir = plan.root.join("content");
    fs::create_dir_all(&content_dir)?;
    fs::write(&plan.config_file, STARTER_CONFIG)?;

    let starter = content_dir.join(STARTER_CLUSTER_FILE);
    if !starter.exists() {
        fs::write(&starter, STARTER_CLUSTER)?;
    }
    tracing::info!(root = %plan.root.display(), "initialized workspace");
    Ok(true)
}

fn absolutize(raw: &str) -> Result<PathBuf, CliError> {
    let candidate = PathBuf::from(raw);
    let base = if candidate.is_absolute() {
        candidate
    } else {
        env::current_dir()?.join(candidate)
    };

    Ok(lexical_normalize(&base))
}

/// Resolves `.` and `..` without touching the filesystem; the target may not exist yet.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized
                    .components()
                    .next_back()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    normalized.pop();
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
