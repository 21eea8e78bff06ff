use std::process::ExitCode;

use folio::{ArticleLink, IssueSeverity, ValidationReport};
use serde_json::json;

use crate::commands::CommandResult;
use crate::error::CliError;

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` as text or a single JSON line and maps it to an exit code.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result)?,
        OutputFormat::Json => print_json(&result),
    };
    Ok(ExitCode::from(result.exit_status().code()))
}

fn print_text(result: &CommandResult) -> Result<(), CliError> {
    match result {
        CommandResult::WorkspaceInitialized {
            root,
            config_file,
            created,
            dry_run,
        } => {
            if *dry_run {
                if *created {
                    println!("Dry run: would initialize workspace at {root} (config: {config_file})");
                } else {
                    println!("Dry run: workspace already initialized at {root}");
                }
            } else if *created {
                println!("Initialized workspace at {root} (config: {config_file})");
            } else {
                println!("Workspace already initialized at {root}");
            }
        }
        CommandResult::Check {
            policy,
            fatal,
            report,
        } => print_report(report, *fatal, &format!("{policy:?}").to_lowercase()),
        CommandResult::ArticleList { articles } => {
            println!("Articles ({}):", articles.len());
            for article in articles {
                let category = if article.category.is_empty() {
                    "uncategorized"
                } else {
                    article.category.as_str()
                };
                println!("  - {} [{category}] {}", article.slug, article.title);
            }
        }
        CommandResult::StructuredData { graph, .. } => {
            println!("{}", serde_json::to_string_pretty(graph)?);
        }
        CommandResult::Links { links } => {
            println!("Links for '{}':", links.slug);
            print_article_links("Related articles", &links.related_articles);
            print_paths("Related guides", &links.related_guides);
            print_paths("Related tools", &links.related_tools);
            print_article_links("Backlinks", &links.backlinks);
        }
        CommandResult::LinkGraph { orphans, cycles } => {
            println!("Orphans ({}):", orphans.len());
            for slug in orphans {
                println!("  - {slug}");
            }
            println!("Cycles ({}):", cycles.len());
            for cycle in cycles {
                let mut rendered = cycle.join(" -> ");
                if let Some(first) = cycle.first() {
                    rendered.push_str(&format!(" -> {first}"));
                }
                println!("  - {rendered}");
            }
        }
        CommandResult::Schema { schema } => {
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
    }
    Ok(())
}

fn print_report(report: &ValidationReport, fatal: bool, policy: &str) {
    let verdict = if report.is_success() { "OK" } else { "FAIL" };
    println!(
        "Validation: {verdict} ({} articles, {} errors, {} diagnostics, policy: {policy})",
        report.checked_articles,
        report.error_count(),
        report.diagnostics().count(),
    );
    for (slug, violations) in report.by_article() {
        println!("  {slug}:");
        for violation in violations {
            let marker = match violation.severity() {
                IssueSeverity::Error => "ERR",
                IssueSeverity::Diagnostic => "note",
            };
            println!("    [{marker}] {} {violation}", violation.code());
        }
    }
    if !report.is_success() && !fatal {
        println!("Errors are not fatal under the {policy} policy.");
    }
}

fn print_article_links(title: &str, links: &[ArticleLink]) {
    println!("  {title} ({}):", links.len());
    for link in links {
        println!("    - {} ({}) {}", link.title, link.slug, link.href);
    }
}

fn print_paths(title: &str, paths: &[String]) {
    println!("  {title} ({}):", paths.len());
    for path in paths {
        println!("    - {path}");
    }
}

fn print_json(result: &CommandResult) {
    let payload = json!(result);
    println!("{payload}");
}
