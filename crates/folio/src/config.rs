//! Site identity and build settings read from `folio.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FolioError;
use crate::validation::ValidationPolicy;

/// File name that marks a workspace root.
pub const CONFIG_FILE_NAME: &str = "folio.yaml";

/// Route prefix of article pages when `routes.articles` is not configured.
pub const DEFAULT_ARTICLE_PREFIX: &str = "/articles/";

const DEFAULT_CONTENT_DIR: &str = "content";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub site: SiteIdentity,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIdentity {
    pub name: String,
    /// Absolute origin every canonical URL is built from.
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_author: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    #[serde(default = "default_article_prefix")]
    pub articles: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            articles: default_article_prefix(),
        }
    }
}

fn default_article_prefix() -> String {
    DEFAULT_ARTICLE_PREFIX.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    /// Directory of cluster files, relative to the workspace root.
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default)]
    pub mode: ValidationPolicy,
}

impl SiteConfig {
    /// Minimal configuration with every optional setting at its default.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            site: SiteIdentity {
                name: name.into(),
                base_url: base_url.into(),
                publisher: None,
                default_author: None,
            },
            routes: RouteConfig::default(),
            content: ContentConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| FolioError::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::from_yaml_str(&raw).map_err(|err| err.context(path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, FolioError> {
        let config: SiteConfig =
            serde_yaml::from_str(raw).map_err(|err| FolioError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), FolioError> {
        if self.site.name.trim().is_empty() {
            return Err(FolioError::Config("site.name must not be empty".into()));
        }
        self.base_url()?;
        if let Some(logo) = self.publisher().logo {
            Url::parse(&logo).map_err(|err| {
                FolioError::Config(format!("site.publisher.logo '{logo}' is not a URL: {err}"))
            })?;
        }
        Ok(())
    }

    /// The configured origin as an absolute `http(s)` URL.
    pub fn base_url(&self) -> Result<Url, FolioError> {
        let raw = &self.site.base_url;
        let url = Url::parse(raw)
            .map_err(|err| FolioError::Config(format!("site.baseUrl '{raw}' is invalid: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(FolioError::Config(format!(
                "site.baseUrl '{raw}' must be an absolute http(s) URL"
            )));
        }
        Ok(url)
    }

    /// Article route prefix, always with a leading and a trailing `/`.
    pub fn article_prefix(&self) -> String {
        normalize_prefix(&self.routes.articles)
    }

    /// Site-relative path of an article page.
    pub fn article_href(&self, slug: &str) -> String {
        format!("{}{slug}", self.article_prefix())
    }

    /// Publisher identity, defaulting to the site name without a logo.
    pub fn publisher(&self) -> Publisher {
        self.site.publisher.clone().unwrap_or_else(|| Publisher {
            name: self.site.name.clone(),
            logo: None,
        })
    }

    /// Byline used when an article names no author.
    pub fn default_author(&self) -> &str {
        self.site
            .default_author
            .as_deref()
            .unwrap_or(&self.site.name)
    }

    /// Absolute content directory for a workspace rooted at `root`.
    pub fn content_dir(&self, root: &Path) -> PathBuf {
        if self.content.dir.is_absolute() {
            self.content.dir.clone()
        } else {
            root.join(&self.content.dir)
        }
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
