//! Per-channel default gallery reconciliation.
//!
//! ## `reconcile` — first match wins
//!
//! 1. Walk the editor groups in the order given (platform precedence).
//! 2. Skip groups already in the negative cache.
//! 3. Look up `<prefix>/<group>`; a miss goes into the cache.
//! 4. On the first hit, compare ids with the channel's current gallery and
//!    write only if they differ. Stop either way.
//! 5. Running out of groups leaves the channel as it was.

use serde::Serialize;

use resgal_core::{
    site::gallery_path,
    types::{ChannelSnapshot, GroupName, ResourceGallery},
};

use crate::error::ReconcileError;
use crate::negative_cache::NegativeCache;
use crate::platform::{AssignmentWriter, GalleryLookup};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What reconciling one channel did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The default gallery was changed and committed.
    Assigned {
        group: GroupName,
        gallery: ResourceGallery,
    },
    /// Dry run: the default gallery *would* have been changed.
    WouldAssign {
        group: GroupName,
        gallery: ResourceGallery,
    },
    /// The first matching gallery is already the default.
    Unchanged {
        group: GroupName,
        gallery: ResourceGallery,
    },
    /// No editor group has a gallery; the channel was left alone.
    NoMatch,
}

impl Outcome {
    /// The gallery the channel should use, if any group matched.
    pub fn gallery(&self) -> Option<&ResourceGallery> {
        match self {
            Outcome::Assigned { gallery, .. }
            | Outcome::WouldAssign { gallery, .. }
            | Outcome::Unchanged { gallery, .. } => Some(gallery),
            Outcome::NoMatch => None,
        }
    }

    /// The editor group whose gallery won.
    pub fn group(&self) -> Option<&GroupName> {
        match self {
            Outcome::Assigned { group, .. }
            | Outcome::WouldAssign { group, .. }
            | Outcome::Unchanged { group, .. } => Some(group),
            Outcome::NoMatch => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Owns the negative cache for one run.
#[derive(Debug)]
pub struct Reconciler {
    prefix: String,
    dry_run: bool,
    cache: NegativeCache,
    lookups: usize,
    cache_skips: usize,
}

impl Reconciler {
    /// A reconciler with an empty cache resolving galleries under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            dry_run: false,
            cache: NegativeCache::new(),
            lookups: 0,
            cache_skips: 0,
        }
    }

    /// In dry-run mode lookups and caching are unchanged but nothing is written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn cache(&self) -> &NegativeCache {
        &self.cache
    }

    /// Gallery lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Groups skipped because the cache already knew they had no gallery.
    pub fn cache_skips(&self) -> usize {
        self.cache_skips
    }

    /// Reconcile one channel against its ranked editor groups.
    ///
    /// On a committed write `channel.default_gallery` is updated as well, so
    /// reconciling the same snapshot again is a no-op.
    pub fn reconcile<P>(
        &mut self,
        platform: &mut P,
        channel: &mut ChannelSnapshot,
        editor_groups: &[GroupName],
    ) -> Result<Outcome, ReconcileError>
    where
        P: GalleryLookup + AssignmentWriter + ?Sized,
    {
        for group in editor_groups {
            if self.cache.contains(group) {
                self.cache_skips += 1;
                tracing::debug!("skip {group}: no gallery (cached)");
                continue;
            }

            let path = gallery_path(&self.prefix, group);
            self.lookups += 1;
            let Some(gallery) = platform.find_gallery(&path)? else {
                tracing::debug!("no gallery at {path}");
                self.cache.record_miss(group.clone());
                continue;
            };

            if channel.default_gallery.as_ref() == Some(&gallery.id) {
                tracing::debug!("unchanged: {} -> {}", channel.path, gallery.name);
                return Ok(Outcome::Unchanged {
                    group: group.clone(),
                    gallery,
                });
            }

            if self.dry_run {
                tracing::info!(
                    "[dry-run] would set default resource gallery of {} to {}",
                    channel.path,
                    gallery.name
                );
                return Ok(Outcome::WouldAssign {
                    group: group.clone(),
                    gallery,
                });
            }

            tracing::info!("setting default resource gallery to {}", gallery.name);
            platform.set_default_gallery(&channel.path, &gallery)?;
            channel.default_gallery = Some(gallery.id.clone());
            return Ok(Outcome::Assigned {
                group: group.clone(),
                gallery,
            });
        }

        Ok(Outcome::NoMatch)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use resgal_core::{
        error::PlatformError,
        types::{ChannelPath, GalleryId},
    };

    use super::*;

    const PREFIX: &str = "/Resources/Web authors";

    #[derive(Default)]
    struct Fake {
        galleries: HashMap<String, ResourceGallery>,
        lookups: RefCell<Vec<String>>,
        writes: Vec<(ChannelPath, GalleryId)>,
    }

    impl Fake {
        fn with_gallery(mut self, group: &str, id: &str) -> Self {
            let path = format!("{PREFIX}/{group}");
            self.galleries.insert(
                path.clone(),
                ResourceGallery {
                    id: GalleryId::from(id),
                    name: group.to_string(),
                    path,
                },
            );
            self
        }
    }

    impl GalleryLookup for Fake {
        fn find_gallery(&self, path: &str) -> Result<Option<ResourceGallery>, PlatformError> {
            self.lookups.borrow_mut().push(path.to_string());
            Ok(self.galleries.get(path).cloned())
        }
    }

    impl AssignmentWriter for Fake {
        fn set_default_gallery(
            &mut self,
            channel: &ChannelPath,
            gallery: &ResourceGallery,
        ) -> Result<(), PlatformError> {
            self.writes.push((channel.clone(), gallery.id.clone()));
            Ok(())
        }
    }

    fn channel(path: &str, current: Option<&str>) -> ChannelSnapshot {
        ChannelSnapshot {
            path: ChannelPath::from(path),
            default_gallery: current.map(GalleryId::from),
            rights: vec![],
        }
    }

    fn groups(names: &[&str]) -> Vec<GroupName> {
        names.iter().map(|n| GroupName::from(*n)).collect()
    }

    #[test]
    fn falls_through_missing_group_to_next() {
        let mut fake = Fake::default().with_gallery("Estates", "42");
        let mut reconciler = Reconciler::new(PREFIX);
        let mut n = channel("/n/", None);

        let outcome = reconciler
            .reconcile(&mut fake, &mut n, &groups(&["Parks", "Estates"]))
            .expect("reconcile");

        assert!(matches!(outcome, Outcome::Assigned { .. }));
        assert_eq!(n.default_gallery, Some(GalleryId::from("42")));
        assert_eq!(
            fake.writes,
            vec![(ChannelPath::from("/n/"), GalleryId::from("42"))]
        );
        assert!(reconciler.cache().contains(&GroupName::from("Parks")));
        assert!(!reconciler.cache().contains(&GroupName::from("Estates")));
    }

    #[test]
    fn cached_group_is_not_looked_up_again() {
        let mut fake = Fake::default();
        let mut reconciler = Reconciler::new(PREFIX);

        let mut first = channel("/a/", None);
        reconciler
            .reconcile(&mut fake, &mut first, &groups(&["Parks"]))
            .expect("first");
        let mut m = channel("/m/", None);
        let outcome = reconciler
            .reconcile(&mut fake, &mut m, &groups(&["Parks"]))
            .expect("second");

        assert_eq!(outcome, Outcome::NoMatch);
        assert_eq!(fake.lookups.borrow().len(), 1);
        assert_eq!(reconciler.cache_skips(), 1);
        assert_eq!(m.default_gallery, None);
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let mut fake = Fake::default().with_gallery("Parks", "p-1");
        let mut reconciler = Reconciler::new(PREFIX).with_dry_run(true);
        let mut c = channel("/parks/", Some("old"));

        let outcome = reconciler
            .reconcile(&mut fake, &mut c, &groups(&["Parks"]))
            .expect("reconcile");

        assert!(matches!(outcome, Outcome::WouldAssign { .. }));
        assert!(fake.writes.is_empty());
        assert_eq!(c.default_gallery, Some(GalleryId::from("old")));
    }

    #[test]
    fn empty_group_list_is_no_match() {
        let mut fake = Fake::default();
        let mut reconciler = Reconciler::new(PREFIX);
        let mut c = channel("/", Some("keep"));
        let outcome = reconciler.reconcile(&mut fake, &mut c, &[]).expect("reconcile");
        assert_eq!(outcome, Outcome::NoMatch);
        assert_eq!(reconciler.lookups(), 0);
        assert_eq!(c.default_gallery, Some(GalleryId::from("keep")));
    }
}
