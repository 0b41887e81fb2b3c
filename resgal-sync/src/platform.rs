//! Contracts the reconciler and the traversal driver need from a content
//! platform, and their implementation for [`SiteStore`].
//!
//! Each contract is a separate trait so tests can fake exactly the seam they
//! exercise. [`Platform`] bundles all four for the driver.

use resgal_core::{
    error::PlatformError,
    types::{ChannelPath, ChannelSnapshot, GroupName, ResourceGallery, Role},
    SiteStore,
};

/// Enumerates the content tree.
pub trait ChannelTree {
    /// Every channel exactly once, in traversal order.
    fn channels(&self) -> Result<Vec<ChannelSnapshot>, PlatformError>;
}

/// Reads channel rights.
pub trait PermissionReader {
    /// Groups holding `role` on `channel`, ranked by platform precedence.
    fn groups_for_role(
        &self,
        channel: &ChannelSnapshot,
        role: Role,
    ) -> Result<Vec<GroupName>, PlatformError>;

    fn editor_groups(&self, channel: &ChannelSnapshot) -> Result<Vec<GroupName>, PlatformError> {
        self.groups_for_role(channel, Role::Editor)
    }
}

/// Resolves a gallery by its full path.
pub trait GalleryLookup {
    /// `Ok(None)` when nothing lives at `path`; `Err` only for platform failures.
    fn find_gallery(&self, path: &str) -> Result<Option<ResourceGallery>, PlatformError>;
}

/// Persists default-gallery assignments.
pub trait AssignmentWriter {
    /// Update `channel`'s default gallery and commit before returning.
    fn set_default_gallery(
        &mut self,
        channel: &ChannelPath,
        gallery: &ResourceGallery,
    ) -> Result<(), PlatformError>;
}

/// Everything the traversal driver needs.
pub trait Platform: ChannelTree + PermissionReader + GalleryLookup + AssignmentWriter {}

impl<T> Platform for T where
    T: ChannelTree + PermissionReader + GalleryLookup + AssignmentWriter + ?Sized
{
}

// ---------------------------------------------------------------------------
// SiteStore
// ---------------------------------------------------------------------------

impl ChannelTree for SiteStore {
    fn channels(&self) -> Result<Vec<ChannelSnapshot>, PlatformError> {
        Ok(SiteStore::channels(self))
    }
}

impl PermissionReader for SiteStore {
    fn groups_for_role(
        &self,
        channel: &ChannelSnapshot,
        role: Role,
    ) -> Result<Vec<GroupName>, PlatformError> {
        Ok(SiteStore::groups_for_role(self, channel, role))
    }
}

impl GalleryLookup for SiteStore {
    fn find_gallery(&self, path: &str) -> Result<Option<ResourceGallery>, PlatformError> {
        Ok(SiteStore::find_gallery(self, path).cloned())
    }
}

impl AssignmentWriter for SiteStore {
    fn set_default_gallery(
        &mut self,
        channel: &ChannelPath,
        gallery: &ResourceGallery,
    ) -> Result<(), PlatformError> {
        SiteStore::set_default_gallery(self, channel, gallery)
    }
}
