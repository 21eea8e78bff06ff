//! Slug-keyed article registry.

mod cluster;
mod snapshot;

use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};

use crate::article::Article;
use crate::error::FolioError;

pub use cluster::Cluster;
pub use snapshot::{RegistryHandle, ReloadOutcome};

/// Origin label recorded for articles registered one at a time rather than through a cluster.
pub const DIRECT_ORIGIN: &str = "direct registration";

/// The immutable, slug-keyed collection of every article.
///
/// Assembly goes through [`Registry::register`], [`Registry::merge`] or
/// [`Registry::from_clusters`]; once handed to readers a registry is only ever replaced as a
/// whole (see [`RegistryHandle`]).
#[derive(Clone, Debug, Default)]
pub struct Registry {
    articles: BTreeMap<String, Article>,
    origins: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges clusters in order; the first slug collision aborts assembly.
    pub fn from_clusters<I>(clusters: I) -> Result<Self, FolioError>
    where
        I: IntoIterator<Item = Cluster>,
    {
        let mut registry = Self::new();
        for cluster in clusters {
            registry.merge(cluster)?;
        }
        tracing::info!(articles = registry.len(), "assembled article registry");
        Ok(registry)
    }

    /// Adds one article. Fails without modifying the registry when the slug is taken.
    pub fn register(&mut self, article: Article) -> Result<(), FolioError> {
        self.insert_new(article, DIRECT_ORIGIN)
    }

    /// Adds every article of `cluster`.
    ///
    /// Collisions are checked up front, against the registry and within the cluster itself, so
    /// a failed merge leaves the registry untouched.
    pub fn merge(&mut self, cluster: Cluster) -> Result<(), FolioError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for article in &cluster.articles {
            if let Some(existing) = self.origins.get(&article.slug) {
                return Err(FolioError::DuplicateSlug {
                    slug: article.slug.clone(),
                    existing: describe_origin(existing),
                    incoming: describe_origin(&cluster.name),
                });
            }
            if !seen.insert(article.slug.as_str()) {
                return Err(FolioError::DuplicateSlug {
                    slug: article.slug.clone(),
                    existing: describe_origin(&cluster.name),
                    incoming: describe_origin(&cluster.name),
                });
            }
        }

        tracing::debug!(
            cluster = %cluster.name,
            articles = cluster.articles.len(),
            "merging cluster"
        );
        for article in cluster.articles {
            self.origins.insert(article.slug.clone(), cluster.name.clone());
            self.articles.insert(article.slug.clone(), article);
        }
        Ok(())
    }

    /// Replaces the article with the same slug as a whole, returning the previous entity.
    ///
    /// Registers the article when the slug is new.
    pub fn replace(&mut self, article: Article) -> Option<Article> {
        self.origins
            .entry(article.slug.clone())
            .or_insert_with(|| DIRECT_ORIGIN.to_string());
        self.articles.insert(article.slug.clone(), article)
    }

    pub fn lookup(&self, slug: &str) -> Result<&Article, FolioError> {
        self.articles
            .get(slug)
            .ok_or_else(|| FolioError::NotFound(slug.to_string()))
    }

    /// Every article. The iterator is `Clone`, and each call starts a fresh pass; callers must
    /// not rely on its order.
    pub fn all(&self) -> impl Iterator<Item = &Article> + Clone + '_ {
        self.articles.values()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.articles.keys().map(String::as_str)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.articles.contains_key(slug)
    }

    /// Cluster (or [`DIRECT_ORIGIN`]) an article came from.
    pub fn origin(&self, slug: &str) -> Option<&str> {
        self.origins.get(slug).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// SHA-256 over every article's canonical JSON, in slug order.
    ///
    /// Two registries with equal content produce equal fingerprints regardless of how they were
    /// assembled.
    pub fn fingerprint(&self) -> Result<String, FolioError> {
        let mut hasher = Sha256::new();
        for (slug, article) in &self.articles {
            hasher.update(slug.as_bytes());
            hasher.update([0u8]);
            hasher.update(serde_json::to_vec(article)?);
            hasher.update([0u8]);
        }
        Ok(hex::encode(hasher.finalize()))
    }

    fn insert_new(&mut self, article: Article, origin: &str) -> Result<(), FolioError> {
        if let Some(existing) = self.origins.get(&article.slug) {
            return Err(FolioError::DuplicateSlug {
                slug: article.slug.clone(),
                existing: describe_origin(existing),
                incoming: describe_origin(origin),
            });
        }
        self.origins.insert(article.slug.clone(), origin.to_string());
        self.articles.insert(article.slug.clone(), article);
        Ok(())
    }
}

fn describe_origin(origin: &str) -> String {
    if origin == DIRECT_ORIGIN {
        origin.to_string()
    } else {
        format!("cluster '{origin}'")
    }
}
