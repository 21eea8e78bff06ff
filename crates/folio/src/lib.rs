//! Folio content core.
//!
//! Typed long-form articles, a slug-keyed registry, registry-wide integrity validation,
//! JSON-LD synthesis and the related-article link graph.

pub mod article;
pub mod config;
pub mod error;
pub mod link_graph;
pub mod loader;
pub mod registry;
pub mod section;
pub mod slug;
pub mod structured_data;
pub mod validation;
pub mod workspace;

pub use article::{
    Article, FaqEntry, PageMetadata, ProductDeclaration, ProductRating, PromoBlock, TocEntry,
    WarningBox,
};
pub use config::{CONFIG_FILE_NAME, DEFAULT_ARTICLE_PREFIX, Publisher, SiteConfig};
pub use error::FolioError;
pub use link_graph::{ArticleLink, LinkGraph, ResolvedLinks};
pub use loader::{cluster_schema, load_cluster_file, load_clusters, load_registry};
pub use registry::{Cluster, Registry, RegistryHandle, ReloadOutcome};
pub use section::{CalloutKind, Section, SectionContainer};
pub use slug::{is_path_shaped, is_valid_slug, slugify};
pub use structured_data::{GraphNode, StructuredDataGraph, Synthesizer};
pub use validation::{
    IssueSeverity, ValidationOptions, ValidationPolicy, ValidationReport, ValidationStatus,
    Validator, Violation, validate_registry,
};
pub use workspace::{
    CONFIG_FILE_NAMES, FilesystemWorkspaceLocator, WorkspaceLocator, WorkspacePaths,
    config_file_in, discover,
};
