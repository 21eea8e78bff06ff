use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::FolioError;
use crate::validation::{ValidationPolicy, ValidationReport, Validator};

use super::Registry;

/// Result of a successful [`RegistryHandle::reload`].
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The candidate was validated and is now the current snapshot.
    Swapped(ValidationReport),
    /// The candidate's content fingerprint matched the current snapshot, whose report is not
    /// fatal under the requested policy; nothing was swapped.
    Unchanged,
}

/// Shared pointer to the current registry snapshot.
///
/// Readers take an `Arc<Registry>` and keep using it for as long as they like. A reload
/// builds and validates the replacement completely before the pointer is swapped, so a
/// reader never observes a partially rebuilt registry.
pub struct RegistryHandle {
    current: RwLock<Snapshot>,
}

struct Snapshot {
    registry: Arc<Registry>,
    fingerprint: String,
    report: ValidationReport,
}

impl RegistryHandle {
    /// Validates `initial` under `policy` and serves it as the first snapshot.
    pub fn new(
        initial: Registry,
        validator: &Validator,
        policy: ValidationPolicy,
    ) -> Result<Self, FolioError> {
        let fingerprint = initial.fingerprint()?;
        let report = validator.check(&initial);
        if report.is_fatal(policy) {
            return Err(FolioError::Rejected(Box::new(report)));
        }
        Ok(Self {
            current: RwLock::new(Snapshot {
                registry: Arc::new(initial),
                fingerprint,
                report,
            }),
        })
    }

    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.read().registry.clone()
    }

    pub fn fingerprint(&self) -> String {
        self.current.read().fingerprint.clone()
    }

    /// Report produced when the current snapshot was validated.
    pub fn report(&self) -> ValidationReport {
        self.current.read().report.clone()
    }

    /// Validates `candidate` and swaps it in unless the report is fatal under `policy`.
    ///
    /// A rejected candidate is returned inside [`FolioError::Rejected`] and the current
    /// snapshot stays in place. Content identical to the current snapshot is not validated
    /// again; its stored report is judged under `policy` instead.
    pub fn reload(
        &self,
        candidate: Registry,
        validator: &Validator,
        policy: ValidationPolicy,
    ) -> Result<ReloadOutcome, FolioError> {
        let fingerprint = candidate.fingerprint()?;
        {
            let current = self.current.read();
            if fingerprint == current.fingerprint {
                if current.report.is_fatal(policy) {
                    return Err(FolioError::Rejected(Box::new(current.report.clone())));
                }
                tracing::debug!(%fingerprint, "registry content unchanged; skipping reload");
                return Ok(ReloadOutcome::Unchanged);
            }
        }

        let report = validator.check(&candidate);
        if report.is_fatal(policy) {
            tracing::warn!(
                errors = report.error_count(),
                "rejected registry snapshot"
            );
            return Err(FolioError::Rejected(Box::new(report)));
        }

        let articles = candidate.len();
        let next = Snapshot {
            registry: Arc::new(candidate),
            fingerprint,
            report: report.clone(),
        };
        *self.current.write() = next;
        tracing::info!(articles, "swapped registry snapshot");
        Ok(ReloadOutcome::Swapped(report))
    }
}
