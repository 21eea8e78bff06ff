//! Locating the site that owns a working directory.
//!
//! A Folio site is the nearest directory, walking upwards, that carries a site config. Both
//! `folio.yaml` and the short `folio.yml` spelling are recognized; when a directory has both,
//! `folio.yaml` wins.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::{CONFIG_FILE_NAME, SiteConfig};
use crate::error::FolioError;

/// Config file names checked in each directory, in order of preference.
pub const CONFIG_FILE_NAMES: [&str; 2] = [CONFIG_FILE_NAME, "folio.yml"];

/// Site root plus the config file that marks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspacePaths {
    root: PathBuf,
    config_file: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf, config_file: PathBuf) -> Self {
        Self { root, config_file }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn load_config(&self) -> Result<SiteConfig, FolioError> {
        SiteConfig::load(&self.config_file)
    }

    /// Directory holding the cluster files, as configured relative to the site root.
    pub fn content_dir(&self, config: &SiteConfig) -> PathBuf {
        config.content_dir(&self.root)
    }
}

pub trait WorkspaceLocator: Send + Sync {
    fn workspace(&self) -> Result<WorkspacePaths, FolioError>;
}

/// Discovers the site once and reuses the answer while its config file is still there.
pub struct FilesystemWorkspaceLocator {
    start: PathBuf,
    cache: Mutex<Option<WorkspacePaths>>,
}

impl FilesystemWorkspaceLocator {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn from_current_dir() -> Result<Self, FolioError> {
        Ok(Self::new(env::current_dir()?))
    }
}

impl WorkspaceLocator for FilesystemWorkspaceLocator {
    fn workspace(&self) -> Result<WorkspacePaths, FolioError> {
        let mut cache = self.cache.lock();
        let cached = cache
            .as_ref()
            .filter(|paths| paths.config_file().is_file())
            .cloned();
        if let Some(paths) = cached {
            return Ok(paths);
        }

        let discovered = discover(&self.start);
        *cache = discovered.as_ref().ok().cloned();
        discovered
    }
}

/// The site config inside `dir`, if there is one.
pub fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Finds the site owning `start`.
///
/// `start` may be a file, or a path that does not exist yet (for example a cluster file about
/// to be written); the search begins at its nearest existing directory.
pub fn discover(start: impl AsRef<Path>) -> Result<WorkspacePaths, FolioError> {
    let from = search_origin(start.as_ref())?;

    let found = from
        .ancestors()
        .find_map(|dir| config_file_in(dir).map(|config| (dir.to_path_buf(), config)));
    match found {
        Some((root, config_file)) => {
            tracing::debug!(root = %root.display(), "discovered workspace");
            Ok(WorkspacePaths::new(root, config_file))
        }
        None => Err(FolioError::Workspace(format!(
            "no {CONFIG_FILE_NAME} found from {}",
            from.display()
        ))),
    }
}

fn search_origin(start: &Path) -> Result<PathBuf, FolioError> {
    let absolute = if start.is_absolute() {
        start.to_path_buf()
    } else {
        env::current_dir()?.join(start)
    };

    let dir = absolute
        .ancestors()
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| {
            FolioError::Workspace(format!(
                "{} has no existing parent directory",
                start.display()
            ))
        })?;
    Ok(fs::canonicalize(dir)?)
}
