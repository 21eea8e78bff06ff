//! Reads cluster files from disk.
//!
//! Loading is the only place the library touches the filesystem for content. Everything
//! downstream (validation, synthesis, link resolution) works on the assembled [`Registry`].

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use schemars::Schema;

use crate::config::SiteConfig;
use crate::error::FolioError;
use crate::registry::{Cluster, Registry};
use crate::workspace::WorkspacePaths;

const CLUSTER_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Lists cluster files under `dir` in path order, honouring `.gitignore` and skipping hidden files.
pub fn cluster_files(dir: &Path) -> Result<Vec<PathBuf>, FolioError> {
    if !dir.is_dir() {
        return Err(FolioError::Workspace(format!(
            "content directory {} does not exist",
            dir.display()
        )));
    }

    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| FolioError::Workspace(err.to_string()))?;
        let path = entry.path();
        if path.is_file() && has_cluster_extension(path) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn has_cluster_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CLUSTER_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Parses one cluster file. A file without a `cluster` name is named after its stem.
pub fn load_cluster_file(path: &Path) -> Result<Cluster, FolioError> {
    let raw = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed: Result<Cluster, FolioError> = if is_json {
        serde_json::from_str(&raw).map_err(FolioError::from)
    } else {
        serde_yaml::from_str(&raw).map_err(FolioError::from)
    };
    let mut cluster = parsed.map_err(|err| err.context(path.display()))?;

    if cluster.name.trim().is_empty() {
        cluster.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    tracing::debug!(
        path = %path.display(),
        cluster = %cluster.name,
        articles = cluster.articles.len(),
        "loaded cluster file"
    );
    Ok(cluster)
}

pub fn load_clusters(dir: &Path) -> Result<Vec<Cluster>, FolioError> {
    cluster_files(dir)?
        .iter()
        .map(|path| load_cluster_file(path))
        .collect()
}

/// Loads every cluster of the workspace's content directory and assembles the registry.
pub fn load_registry(
    workspace: &WorkspacePaths,
    config: &SiteConfig,
) -> Result<Registry, FolioError> {
    let dir = workspace.content_dir(config);
    Registry::from_clusters(load_clusters(&dir)?)
}

/// JSON Schema of a cluster file, for editor integration.
pub fn cluster_schema() -> Schema {
    schemars::schema_for!(Cluster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RETIREMENT: &str = r#"
cluster: retirement
articles:
  - slug: roth-ira
    title: Roth IRA basics
    metadata:
      title: Roth IRA basics
      description: How a Roth IRA works.
    category: Retirement
    published: 2024-03-01
"#;

    const METALS_JSON: &str = r#"{
  "articles": [
    {
      "slug": "gold-ira",
      "title": "Gold IRA guide",
      "metadata": { "title": "Gold IRA guide", "description": "Precious metals." },
      "category": "Metals",
      "published": "2024-05-10",
      "relatedArticles": ["roth-ira"]
    }
  ]
}"#;

    #[test]
    fn loads_yaml_and_json_clusters_in_path_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b-retirement.yaml"), RETIREMENT).unwrap();
        fs::write(temp.path().join("a-metals.json"), METALS_JSON).unwrap();
        fs::write(temp.path().join("README.md"), "# not content").unwrap();

        let clusters = load_clusters(temp.path()).unwrap();
        let names: Vec<_> = clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a-metals", "retirement"]);
        assert_eq!(clusters[0].articles[0].related_articles, vec!["roth-ira"]);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "articles: [ {slug: 1").unwrap();

        let err = load_cluster_file(&path).unwrap_err();
        assert!(matches!(err, FolioError::Serialization(_)));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn missing_content_dir_is_a_workspace_error() {
        let temp = tempdir().unwrap();
        let err = load_clusters(&temp.path().join("content")).unwrap_err();
        assert!(matches!(err, FolioError::Workspace(_)));
    }

    #[test]
    fn schema_describes_cluster_files() {
        let schema = serde_json::to_value(cluster_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("cluster").is_some());
        assert!(properties.get("articles").is_some());
    }
}
