//! File-backed content store.
//!
//! # Storage layout
//!
//! A site is one YAML document:
//!
//! ```text
//! galleries:            (flat list, addressed by full path)
//!   - id / name / path
//! root:                 (channel tree)
//!   path / default_gallery / rights / children
//! ```
//!
//! # Commit protocol
//!
//! Every assignment is committed before [`SiteStore::set_default_gallery`]
//! returns: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::PlatformError;
use crate::types::{
    Channel, ChannelPath, ChannelSnapshot, GroupName, ResourceGallery, Role, Site,
};

/// Whether writes are allowed while the store is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Lookups only; every write fails with [`PlatformError::ReadOnly`].
    ReadOnly,
    /// Writes are applied in memory and committed to disk immediately.
    Update,
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<prefix>/<group>` with any trailing `/` on the prefix collapsed — pure.
pub fn gallery_path(prefix: &str, group: &GroupName) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), group.0)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

// ---------------------------------------------------------------------------
// 2. Load / save
// ---------------------------------------------------------------------------

/// Load a site file.
///
/// Returns `PlatformError::SiteNotFound` if absent,
/// `PlatformError::Parse` (with path + line context) if malformed YAML,
/// `PlatformError::DuplicateChannel` if two channels share a path.
pub fn load_site(path: &Path) -> Result<Site, PlatformError> {
    if !path.exists() {
        return Err(PlatformError::SiteNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let site: Site = serde_yaml::from_str(&contents).map_err(|e| PlatformError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    check_unique_paths(&site.root)?;
    Ok(site)
}

/// Channel paths address writes, so each must name exactly one node.
/// Paths are compared the way galleries are, ignoring a trailing `/`.
fn check_unique_paths(root: &Channel) -> Result<(), PlatformError> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(channel) = stack.pop() {
        if !seen.insert(normalize(&channel.path.0)) {
            return Err(PlatformError::DuplicateChannel {
                path: channel.path.0.clone(),
            });
        }
        stack.extend(channel.children.iter().rev());
    }
    Ok(())
}

/// Atomically save a site file.
///
/// `.tmp` is always in the same directory as the target (same filesystem).
pub fn save_site(path: &Path, site: &Site) -> Result<(), PlatformError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let tmp_path = tmp_path_for(path);
    let yaml = serde_yaml::to_string(site)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `<file>.tmp` next to `path`.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// 3. Store
// ---------------------------------------------------------------------------

/// A site loaded into memory, bound to the file it commits to.
#[derive(Debug)]
pub struct SiteStore {
    path: PathBuf,
    mode: AccessMode,
    site: Site,
}

impl SiteStore {
    /// Load the site at `path` in the given access mode.
    pub fn open(path: impl Into<PathBuf>, mode: AccessMode) -> Result<Self, PlatformError> {
        let path = path.into();
        let site = load_site(&path)?;
        Ok(Self { path, mode, site })
    }

    /// Wrap an in-memory site. Nothing is written until the first commit.
    pub fn with_site(path: impl Into<PathBuf>, site: Site, mode: AccessMode) -> Self {
        Self {
            path: path.into(),
            mode,
            site,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Every channel exactly once, pre-order depth first, children in file order.
    pub fn channels(&self) -> Vec<ChannelSnapshot> {
        let mut out = Vec::new();
        let mut stack: Vec<&Channel> = vec![&self.site.root];
        while let Some(channel) = stack.pop() {
            out.push(channel.snapshot());
            stack.extend(channel.children.iter().rev());
        }
        out
    }

    /// Groups holding `role` on `channel`, in the channel's rights order.
    pub fn groups_for_role(&self, channel: &ChannelSnapshot, role: Role) -> Vec<GroupName> {
        channel
            .rights
            .iter()
            .filter(|grant| grant.role == role)
            .map(|grant| grant.group.clone())
            .collect()
    }

    /// The gallery whose path equals `path`, ignoring a trailing `/`.
    pub fn find_gallery(&self, path: &str) -> Option<&ResourceGallery> {
        let wanted = normalize(path);
        self.site
            .galleries
            .iter()
            .find(|g| normalize(&g.path) == wanted)
    }

    /// Set `channel`'s default gallery and commit the site.
    pub fn set_default_gallery(
        &mut self,
        channel: &ChannelPath,
        gallery: &ResourceGallery,
    ) -> Result<(), PlatformError> {
        if self.mode == AccessMode::ReadOnly {
            return Err(PlatformError::ReadOnly {
                path: self.path.clone(),
            });
        }
        let node = find_channel_mut(&mut self.site.root, channel).ok_or_else(|| {
            PlatformError::ChannelNotFound {
                path: channel.0.clone(),
            }
        })?;
        node.default_gallery = Some(gallery.id.clone());
        self.commit()
    }

    fn commit(&self) -> Result<(), PlatformError> {
        if self.mode == AccessMode::ReadOnly {
            return Err(PlatformError::ReadOnly {
                path: self.path.clone(),
            });
        }
        save_site(&self.path, &self.site)
    }
}

fn find_channel_mut<'a>(node: &'a mut Channel, path: &ChannelPath) -> Option<&'a mut Channel> {
    if &node.path == path {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_channel_mut(child, path))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), PlatformError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), PlatformError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
