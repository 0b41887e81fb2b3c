//! In-memory platform with call counters and failure injection.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use resgal_core::{
    error::PlatformError,
    types::{
        ChannelPath, ChannelSnapshot, GalleryId, GroupName, ResourceGallery, RightsGrant, Role,
    },
};
use resgal_sync::{AssignmentWriter, ChannelTree, GalleryLookup, PermissionReader};

pub const PREFIX: &str = "/Resources/Web authors";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
pub struct FakePlatform {
    pub channels: Vec<ChannelSnapshot>,
    pub galleries: HashMap<String, ResourceGallery>,
    pub lookups: RefCell<Vec<String>>,
    pub rights_reads: Cell<usize>,
    pub writes: Vec<(ChannelPath, GalleryId)>,
    /// Lookups for this path fail with a platform error.
    pub fail_lookup: Option<String>,
    /// Rights reads for this channel fail with a platform error.
    pub fail_rights: Option<ChannelPath>,
    pub fail_writes: bool,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gallery(mut self, group: &str, id: &str) -> Self {
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

    pub fn channel(mut self, path: &str, current: Option<&str>, editors: &[&str]) -> Self {
        self.channels.push(snapshot(path, current, editors));
        self
    }

    pub fn lookup_count(&self, group: &str) -> usize {
        let path = format!("{PREFIX}/{group}");
        self.lookups.borrow().iter().filter(|p| **p == path).count()
    }

    pub fn total_lookups(&self) -> usize {
        self.lookups.borrow().len()
    }
}

pub fn snapshot(path: &str, current: Option<&str>, editors: &[&str]) -> ChannelSnapshot {
    ChannelSnapshot {
        path: ChannelPath::from(path),
        default_gallery: current.map(GalleryId::from),
        rights: editors
            .iter()
            .map(|g| RightsGrant {
                group: GroupName::from(*g),
                role: Role::Editor,
            })
            .collect(),
    }
}

pub fn groups(names: &[&str]) -> Vec<GroupName> {
    names.iter().map(|n| GroupName::from(*n)).collect()
}

impl ChannelTree for FakePlatform {
    fn channels(&self) -> Result<Vec<ChannelSnapshot>, PlatformError> {
        Ok(self.channels.clone())
    }
}

impl PermissionReader for FakePlatform {
    fn groups_for_role(
        &self,
        channel: &ChannelSnapshot,
        role: Role,
    ) -> Result<Vec<GroupName>, PlatformError> {
        self.rights_reads.set(self.rights_reads.get() + 1);
        if self.fail_rights.as_ref() == Some(&channel.path) {
            return Err(PlatformError::Unavailable(format!(
                "cannot read rights for {}",
                channel.path
            )));
        }
        Ok(channel
            .rights
            .iter()
            .filter(|g| g.role == role)
            .map(|g| g.group.clone())
            .collect())
    }
}

impl GalleryLookup for FakePlatform {
    fn find_gallery(&self, path: &str) -> Result<Option<ResourceGallery>, PlatformError> {
        self.lookups.borrow_mut().push(path.to_string());
        if self.fail_lookup.as_deref() == Some(path) {
            return Err(PlatformError::Unavailable(format!("lookup of {path} timed out")));
        }
        Ok(self.galleries.get(path).cloned())
    }
}

impl AssignmentWriter for FakePlatform {
    fn set_default_gallery(
        &mut self,
        channel: &ChannelPath,
        gallery: &ResourceGallery,
    ) -> Result<(), PlatformError> {
        if self.fail_writes {
            return Err(PlatformError::Unavailable("commit rejected".to_string()));
        }
        self.writes.push((channel.clone(), gallery.id.clone()));
        if let Some(c) = self.channels.iter_mut().find(|c| &c.path == channel) {
            c.default_gallery = Some(gallery.id.clone());
        }
        Ok(())
    }
}
