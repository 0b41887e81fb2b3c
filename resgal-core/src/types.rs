//! Domain types for the content tree and its resource galleries.
//!
//! All types are serializable/deserializable via serde + serde_yaml; the
//! site file is a direct serialization of [`Site`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifying path of a channel, e.g. `/parks/playgrounds/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelPath(pub String);

impl fmt::Display for ChannelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ChannelPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChannelPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Name of a permission group. Also the last segment of a gallery path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupName(pub String);

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GroupName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Stable unique identifier of a resource gallery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryId(pub String);

impl fmt::Display for GalleryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GalleryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GalleryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Role a group holds on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Subscriber,
    Author,
    Editor,
    Moderator,
    ChannelManager,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Subscriber => write!(f, "subscriber"),
            Role::Author => write!(f, "author"),
            Role::Editor => write!(f, "editor"),
            Role::Moderator => write!(f, "moderator"),
            Role::ChannelManager => write!(f, "channel_manager"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One group's role on a channel. Position in [`Channel::rights`] is precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsGrant {
    pub group: GroupName,
    pub role: Role,
}

/// A named storage area for uploaded resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGallery {
    pub id: GalleryId,
    pub name: String,
    /// Full gallery path, e.g. `/Resources/Web authors/Parks`.
    pub path: String,
}

/// A node of the content tree as stored in the site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub path: ChannelPath,
    #[serde(default)]
    pub default_gallery: Option<GalleryId>,
    #[serde(default)]
    pub rights: Vec<RightsGrant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Channel>,
}

impl Channel {
    /// A leaf channel with no rights and no gallery.
    pub fn new(path: impl Into<ChannelPath>) -> Self {
        Self {
            path: path.into(),
            default_gallery: None,
            rights: vec![],
            children: vec![],
        }
    }

    /// The channel without its children.
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            path: self.path.clone(),
            default_gallery: self.default_gallery.clone(),
            rights: self.rights.clone(),
        }
    }
}

/// A channel as handed to the reconciler: everything but the subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub path: ChannelPath,
    pub default_gallery: Option<GalleryId>,
    pub rights: Vec<RightsGrant>,
}

/// Root of a site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub galleries: Vec<ResourceGallery>,
    pub root: Channel,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
