use folio::is_valid_slug;

use crate::error::{CliError, ExitStatus};

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

/// Rejects slugs that could never be registered before touching the registry.
pub fn validate_slug(slug: &str) -> Result<(), CliError> {
    if slug.is_empty() {
        return Err(CliError::new("slug must not be empty", ExitStatus::Usage));
    }
    if !is_valid_slug(slug) {
        return Err(CliError::new(
            format!("slug '{slug}' must be lowercase alphanumeric with hyphen separators"),
            ExitStatus::Usage,
        ));
    }
    Ok(())
}
