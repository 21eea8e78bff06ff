use std::path::PathBuf;

use folio::{
    FilesystemWorkspaceLocator, Registry, SiteConfig, WorkspaceLocator, WorkspacePaths,
    load_registry,
};

use crate::error::CliError;
use crate::util::Verbosity;

/// Everything a workspace command needs: the resolved workspace, its configuration and the
/// assembled (not yet validated) registry.
pub struct CliSession {
    pub workspace: WorkspacePaths,
    pub config: SiteConfig,
    pub registry: Registry,
    pub verbosity: Verbosity,
}

impl CliSession {
    pub fn bootstrap(
        workspace_override: Option<String>,
        verbosity: Verbosity,
    ) -> Result<Self, CliError> {
        let locator = match workspace_override {
            Some(path) => FilesystemWorkspaceLocator::new(PathBuf::from(path)),
            None => FilesystemWorkspaceLocator::from_current_dir()?,
        };

        let workspace = locator.workspace()?;
        let config = workspace.load_config()?;
        let registry = load_registry(&workspace, &config)?;

        Ok(Self {
            workspace,
            config,
            registry,
            verbosity,
        })
    }

    pub fn content_dir(&self) -> PathBuf {
        self.workspace.content_dir(&self.config)
    }
}
