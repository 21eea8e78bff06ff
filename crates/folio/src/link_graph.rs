//! Directed graph over `relatedArticles`.
//!
//! Edges pointing at the article itself are dropped (the validator reports them), as are edges
//! to slugs the registry does not contain. Orphans and cycles are content-health signals, never
//! errors.

use std::collections::BTreeSet;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;

use crate::article::Article;
use crate::config::SiteConfig;
use crate::error::FolioError;
use crate::registry::Registry;

/// A navigable link to another article, as handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArticleLink {
    pub slug: String,
    pub title: String,
    pub href: String,
}

/// Everything an article page links to, plus the articles that link back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLinks {
    pub slug: String,
    pub related_articles: Vec<ArticleLink>,
    /// Passed through as authored; they live outside the registry.
    pub related_guides: Vec<String>,
    pub related_tools: Vec<String>,
    pub backlinks: Vec<ArticleLink>,
}

pub struct LinkGraph<'a> {
    registry: &'a Registry,
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> LinkGraph<'a> {
    pub fn build(registry: &'a Registry) -> Self {
        let mut graph = DiGraphMap::new();
        for slug in registry.slugs() {
            graph.add_node(slug);
        }
        for article in registry.all() {
            for target in &article.related_articles {
                if *target != article.slug && registry.contains(target) {
                    graph.add_edge(article.slug.as_str(), target.as_str(), ());
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built link graph"
        );
        Self { registry, graph }
    }

    /// Related articles of `slug`, in authored order.
    ///
    /// Fails with `NotFound` for an unknown slug and with `BrokenReference` for the first
    /// related slug that is not registered. Self-references and repeats are skipped.
    pub fn resolve(&self, slug: &str) -> Result<Vec<&'a Article>, FolioError> {
        let article = self.registry.lookup(slug)?;
        let mut seen = BTreeSet::new();
        let mut resolved = Vec::new();

        for target in &article.related_articles {
            if *target == article.slug || !seen.insert(target.as_str()) {
                continue;
            }
            let linked = self
                .registry
                .lookup(target)
                .map_err(|_| FolioError::BrokenReference {
                    from: article.slug.clone(),
                    to: target.clone(),
                })?;
            resolved.push(linked);
        }
        Ok(resolved)
    }

    /// Articles no other article links to.
    pub fn orphans(&self) -> BTreeSet<String> {
        self.graph
            .nodes()
            .filter(|node| {
                self.graph
                    .neighbors_directed(*node, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(str::to_string)
            .collect()
    }

    /// Slugs of the articles that list `slug` as related, sorted.
    pub fn inbound(&self, slug: &str) -> Vec<&'a str> {
        let Ok(article) = self.registry.lookup(slug) else {
            return Vec::new();
        };
        let mut sources: Vec<_> = self
            .graph
            .neighbors_directed(article.slug.as_str(), Direction::Incoming)
            .collect();
        sources.sort_unstable();
        sources
    }

    /// Every elementary cycle, each starting at its smallest slug, sorted.
    ///
    /// The search runs per strongly connected component. From each member it only walks
    /// through larger slugs, so every cycle is found once and already in its rotated form.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        for component in tarjan_scc(&self.graph) {
            if component.len() < 2 {
                continue;
            }
            let members: BTreeSet<&'a str> = component.into_iter().collect();
            for &start in &members {
                let mut path = vec![start];
                self.walk_cycles(start, &members, &mut path, &mut cycles);
            }
        }
        cycles.sort();
        cycles
    }

    fn walk_cycles(
        &self,
        start: &'a str,
        members: &BTreeSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        let Some(&node) = path.last() else {
            return;
        };
        let mut next: Vec<&'a str> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .filter(|n| members.contains(n))
            .collect();
        next.sort_unstable();

        for neighbor in next {
            if neighbor == start {
                cycles.push(path.iter().map(|slug| slug.to_string()).collect());
            } else if neighbor > start && !path.contains(&neighbor) {
                path.push(neighbor);
                self.walk_cycles(start, members, path, cycles);
                path.pop();
            }
        }
    }

    /// Renderer-ready links for one article page.
    pub fn links(&self, slug: &str, config: &SiteConfig) -> Result<ResolvedLinks, FolioError> {
        let article = self.registry.lookup(slug)?;
        let to_link = |linked: &Article| ArticleLink {
            slug: linked.slug.clone(),
            title: linked.title.clone(),
            href: config.article_href(&linked.slug),
        };

        let related_articles = self.resolve(slug)?.into_iter().map(to_link).collect();
        let backlinks = self
            .inbound(slug)
            .into_iter()
            .filter_map(|source| self.registry.lookup(source).ok())
            .map(to_link)
            .collect();

        Ok(ResolvedLinks {
            slug: article.slug.clone(),
            related_articles,
            related_guides: article.related_guides.clone(),
            related_tools: article.related_tools.clone(),
            backlinks,
        })
    }
}
