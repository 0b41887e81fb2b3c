//! # resgal-sync
//!
//! Default resource gallery reconciliation.
//!
//! Call [`pipeline::run`] with anything implementing [`Platform`] to
//! reconcile a whole site, or [`pipeline::run_site`] for a site file.
//! [`Reconciler`] handles a single channel.

pub mod error;
pub mod negative_cache;
pub mod pipeline;
pub mod platform;
pub mod reconciler;

pub use error::ReconcileError;
pub use negative_cache::NegativeCache;
pub use pipeline::{run, run_site, ChannelReport, RunOptions, RunSummary};
pub use platform::{AssignmentWriter, ChannelTree, GalleryLookup, PermissionReader, Platform};
pub use reconciler::{Outcome, Reconciler};
