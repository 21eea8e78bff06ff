use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::article::Article;

/// A topic sub-registry: one authored content file.
///
/// Clusters are disjoint; merging two that share a slug fails.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cluster {
    /// Cluster name. Loaders default it to the file stem when the file omits it.
    #[serde(rename = "cluster", default)]
    pub name: String,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            articles: Vec::new(),
        }
    }

    pub fn with_article(mut self, article: Article) -> Self {
        self.articles.push(article);
        self
    }
}
