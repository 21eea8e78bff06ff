use folio::Article;
use serde::Serialize;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

#[derive(Clone, Debug, Serialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub cluster: Option<String>,
    pub href: String,
}

pub fn command() -> clap::Command {
    clap::Command::new("list").about("List registered articles")
}

pub fn run(session: &CliSession) -> Result<CommandResult, CliError> {
    let mut articles: Vec<_> = session
        .registry
        .all()
        .map(|article| summarize(session, article))
        .collect();
    articles.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(CommandResult::ArticleList { articles })
}

fn summarize(session: &CliSession, article: &Article) -> ArticleSummary {
    ArticleSummary {
        slug: article.slug.clone(),
        title: article.title.clone(),
        category: article.category.clone(),
        cluster: session.registry.origin(&article.slug).map(str::to_string),
        href: session.config.article_href(&article.slug),
    }
}
