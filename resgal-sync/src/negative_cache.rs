//! Run-scoped memo of groups that have no gallery.
//!
//! Sitewide groups appear on thousands of channels and their absence does
//! not change during a run, so one failed lookup per group is enough.
//! The set only grows; a new run starts from an empty cache.

use std::collections::HashSet;

use resgal_core::types::GroupName;

#[derive(Debug, Default)]
pub struct NegativeCache {
    groups: HashSet<GroupName>,
}

impl NegativeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, group: &GroupName) -> bool {
        self.groups.contains(group)
    }

    /// Record a failed lookup. Returns `false` if the group was already known.
    pub fn record_miss(&mut self, group: GroupName) -> bool {
        self.groups.insert(group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Cached groups, sorted for stable output.
    pub fn sorted(&self) -> Vec<GroupName> {
        let mut groups: Vec<GroupName> = self.groups.iter().cloned().collect();
        groups.sort();
        groups
    }
}
