//! Registry-wide integrity checks.
//!
//! The validator never stops at the first problem: every check runs against every article and
//! all findings come back in one [`ValidationReport`], so authors can fix content in one pass.
//! Whether a finding blocks a build is decided by the caller through [`ValidationPolicy`].

mod checks;
mod links;

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ARTICLE_PREFIX, SiteConfig};
use crate::registry::Registry;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Diagnostic,
}

/// A single integrity finding. Every variant names the article it was found in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A table-of-contents entry or in-page link points at a section id that does not exist.
    DanglingAnchor { slug: String, id: String },
    /// The hand-maintained structured-data FAQ differs from the page FAQ at `index`.
    FaqMismatch { slug: String, index: usize },
    /// A related or inline article link names a slug missing from the registry.
    BrokenReference { slug: String, target: String },
    /// A related guide or tool path is empty or not site-relative.
    MalformedPath { slug: String, path: String },
    /// A table row's width differs from its header count.
    MalformedTable { slug: String, section_id: String },
    InvalidSlug { slug: String },
    InvalidSectionId { slug: String, id: String },
    DuplicateSectionId { slug: String, id: String },
    /// An empty list, table or prose block.
    EmptyBlock { slug: String, section_id: String },
    /// The article lists itself among its related articles.
    SelfReference { slug: String },
    /// A navigable section has no table-of-contents entry.
    UnlistedSection { slug: String, id: String },
}

impl Violation {
    pub fn slug(&self) -> &str {
        match self {
            Violation::DanglingAnchor { slug, .. }
            | Violation::FaqMismatch { slug, .. }
            | Violation::BrokenReference { slug, .. }
            | Violation::MalformedPath { slug, .. }
            | Violation::MalformedTable { slug, .. }
            | Violation::InvalidSlug { slug }
            | Violation::InvalidSectionId { slug, .. }
            | Violation::DuplicateSectionId { slug, .. }
            | Violation::EmptyBlock { slug, .. }
            | Violation::SelfReference { slug }
            | Violation::UnlistedSection { slug, .. } => slug,
        }
    }

    pub fn severity(&self) -> IssueSeverity {
        match self {
            Violation::UnlistedSection { .. } => IssueSeverity::Diagnostic,
            _ => IssueSeverity::Error,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::DanglingAnchor { .. } => "DANGLING_ANCHOR",
            Violation::FaqMismatch { .. } => "FAQ_MISMATCH",
            Violation::BrokenReference { .. } => "BROKEN_REFERENCE",
            Violation::MalformedPath { .. } => "MALFORMED_PATH",
            Violation::MalformedTable { .. } => "MALFORMED_TABLE",
            Violation::InvalidSlug { .. } => "INVALID_SLUG",
            Violation::InvalidSectionId { .. } => "INVALID_SECTION_ID",
            Violation::DuplicateSectionId { .. } => "DUPLICATE_SECTION_ID",
            Violation::EmptyBlock { .. } => "EMPTY_BLOCK",
            Violation::SelfReference { .. } => "SELF_REFERENCE",
            Violation::UnlistedSection { .. } => "UNLISTED_SECTION",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DanglingAnchor { slug, id } => {
                write!(f, "{slug}: anchor '#{id}' does not match any section")
            }
            Violation::FaqMismatch { slug, index } => write!(
                f,
                "{slug}: structured-data FAQ #{index} differs from the page FAQ"
            ),
            Violation::BrokenReference { slug, target } => {
                write!(f, "{slug}: links to missing article '{target}'")
            }
            Violation::MalformedPath { slug, path } => {
                write!(f, "{slug}: '{path}' is not a site-relative path")
            }
            Violation::MalformedTable { slug, section_id } => write!(
                f,
                "{slug}: table in section '{section_id}' has rows that do not match its headers"
            ),
            Violation::InvalidSlug { slug } => {
                write!(f, "{slug}: slug must be lowercase words separated by hyphens")
            }
            Violation::InvalidSectionId { slug, id } => {
                write!(f, "{slug}: section id '{id}' is not anchor-safe")
            }
            Violation::DuplicateSectionId { slug, id } => {
                write!(f, "{slug}: section id '{id}' is used more than once")
            }
            Violation::EmptyBlock { slug, section_id } => {
                write!(f, "{slug}: section '{section_id}' contains an empty block")
            }
            Violation::SelfReference { slug } => {
                write!(f, "{slug}: lists itself as a related article")
            }
            Violation::UnlistedSection { slug, id } => {
                write!(f, "{slug}: section '{id}' is missing from the table of contents")
            }
        }
    }
}

/// Which findings stop a build.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Every error-severity finding is fatal. Intended for CI.
    #[default]
    Strict,
    /// Nothing is fatal. Intended for local preview.
    Preview,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationStatus {
    Success,
    Failure,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    /// All findings, ordered by article slug and then by kind.
    pub violations: Vec<Violation>,
    pub checked_articles: usize,
}

impl ValidationReport {
    fn new(checked_articles: usize) -> Self {
        Self {
            status: ValidationStatus::Success,
            violations: Vec::new(),
            checked_articles,
        }
    }

    fn finalize(&mut self) {
        self.violations
            .sort_by(|a, b| (a.slug(), a).cmp(&(b.slug(), b)));
        self.violations.dedup();
        if self
            .violations
            .iter()
            .any(|v| v.severity() == IssueSeverity::Error)
        {
            self.status = ValidationStatus::Failure;
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == IssueSeverity::Error)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == IssueSeverity::Diagnostic)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// True when the report should fail the surrounding build under `policy`.
    pub fn is_fatal(&self, policy: ValidationPolicy) -> bool {
        match policy {
            ValidationPolicy::Strict => !self.is_success(),
            ValidationPolicy::Preview => false,
        }
    }

    /// Findings grouped per article slug.
    pub fn by_article(&self) -> BTreeMap<&str, Vec<&Violation>> {
        let mut grouped: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
        for violation in &self.violations {
            grouped.entry(violation.slug()).or_default().push(violation);
        }
        grouped
    }
}

#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Route prefix of article pages; inline links under it are checked against the registry.
    pub article_prefix: String,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            article_prefix: DEFAULT_ARTICLE_PREFIX.to_string(),
        }
    }
}

/// Runs every integrity check over a fully assembled registry.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(ValidationOptions {
            article_prefix: config.article_prefix(),
        })
    }

    /// Checks every article in parallel and merges the findings into one sorted report.
    pub fn check(&self, registry: &Registry) -> ValidationReport {
        let articles: Vec<_> = registry.all().collect();
        let mut report = ValidationReport::new(articles.len());

        report.violations = articles
            .par_iter()
            .flat_map_iter(|article| checks::check_article(article, registry, &self.options))
            .collect();
        report.finalize();

        tracing::info!(
            articles = report.checked_articles,
            errors = report.error_count(),
            diagnostics = report.diagnostics().count(),
            "validated registry"
        );
        report
    }
}

/// Validates `registry` with default options.
pub fn validate_registry(registry: &Registry) -> ValidationReport {
    Validator::default().check(registry)
}
