use std::collections::BTreeSet;

use folio::{ResolvedLinks, ValidationPolicy, ValidationReport};
use serde::Serialize;

use crate::error::ExitStatus;

pub mod check;
pub mod graph;
pub mod init;
pub mod jsonld;
pub mod links;
pub mod list;
pub mod schema;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    WorkspaceInitialized {
        root: String,
        config_file: String,
        created: bool,
        dry_run: bool,
    },
    Check {
        policy: ValidationPolicy,
        fatal: bool,
        report: ValidationReport,
    },
    ArticleList {
        articles: Vec<list::ArticleSummary>,
    },
    StructuredData {
        slug: String,
        graph: serde_json::Value,
    },
    Links {
        links: ResolvedLinks,
    },
    LinkGraph {
        orphans: BTreeSet<String>,
        cycles: Vec<Vec<String>>,
    },
    Schema {
        schema: serde_json::Value,
    },
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CommandResult::Check { fatal: true, .. } => ExitStatus::Data,
            CommandResult::WorkspaceInitialized { .. }
            | CommandResult::Check { .. }
            | CommandResult::ArticleList { .. }
            | CommandResult::StructuredData { .. }
            | CommandResult::Links { .. }
            | CommandResult::LinkGraph { .. }
            | CommandResult::Schema { .. } => ExitStatus::Ok,
        }
    }
}
