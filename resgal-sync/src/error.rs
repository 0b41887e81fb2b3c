//! Error types for resgal-sync.

use thiserror::Error;

use resgal_core::error::PlatformError;

/// All errors that can arise while reconciling a site.
///
/// There is no local recovery: the first error ends the run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A platform collaborator failed (enumeration, rights, lookup or write).
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}
