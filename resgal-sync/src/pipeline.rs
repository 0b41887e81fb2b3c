//! Traversal driver shared by `resgal run` and `resgal status`.

use std::path::Path;

use serde::Serialize;

use resgal_core::{
    config::DEFAULT_GALLERY_PREFIX,
    types::{ChannelPath, GalleryId, GroupName},
    AccessMode, SiteStore,
};

use crate::platform::Platform;
use crate::reconciler::{Outcome, Reconciler};
use crate::ReconcileError;

/// Settings for one traversal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Gallery namespace joined with each group name.
    pub prefix: String,
    /// Look everything up but write nothing.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_GALLERY_PREFIX.to_string(),
            dry_run: false,
        }
    }
}

/// Result of reconciling one channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub path: ChannelPath,
    pub editor_groups: Vec<GroupName>,
    /// Default gallery before this run touched the channel.
    pub previous: Option<GalleryId>,
    pub outcome: Outcome,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub channels: Vec<ChannelReport>,
    pub lookups: usize,
    pub cache_skips: usize,
    /// Groups found to have no gallery, sorted.
    pub groups_without_gallery: Vec<GroupName>,
}

impl RunSummary {
    /// Channels written (or that would be, in a dry run).
    pub fn changed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Assigned { .. } | Outcome::WouldAssign { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged { .. }))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|o| matches!(o, Outcome::NoMatch))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.channels.iter().filter(|c| pred(&c.outcome)).count()
    }
}

/// Walk every channel of `platform` once and reconcile it.
///
/// A fresh [`Reconciler`] (and so a fresh negative cache) is created per
/// call. The first error ends the run; later channels are not visited.
pub fn run<P>(platform: &mut P, options: &RunOptions) -> Result<RunSummary, ReconcileError>
where
    P: Platform + ?Sized,
{
    let mut reconciler = Reconciler::new(options.prefix.clone()).with_dry_run(options.dry_run);
    let mut reports = Vec::new();

    for mut channel in platform.channels()? {
        tracing::info!("channel: {}", channel.path);
        let editor_groups = platform.editor_groups(&channel)?;
        let previous = channel.default_gallery.clone();
        let outcome = reconciler.reconcile(&mut *platform, &mut channel, &editor_groups)?;
        reports.push(ChannelReport {
            path: channel.path,
            editor_groups,
            previous,
            outcome,
        });
    }

    let summary = RunSummary {
        dry_run: options.dry_run,
        channels: reports,
        lookups: reconciler.lookups(),
        cache_skips: reconciler.cache_skips(),
        groups_without_gallery: reconciler.cache().sorted(),
    };
    tracing::info!(
        "visited {} channels: {} changed, {} unchanged, {} without gallery ({} lookups, {} cache skips)",
        summary.channels.len(),
        summary.changed(),
        summary.unchanged(),
        summary.unmatched(),
        summary.lookups,
        summary.cache_skips,
    );
    Ok(summary)
}

/// Open the site file at `site` and [`run`] over it.
///
/// The store is opened read-only for a dry run and in update mode otherwise.
pub fn run_site(site: &Path, options: &RunOptions) -> Result<RunSummary, ReconcileError> {
    let mode = if options.dry_run {
        AccessMode::ReadOnly
    } else {
        AccessMode::Update
    };
    let mut store = SiteStore::open(site, mode)?;
    run(&mut store, options)
}
