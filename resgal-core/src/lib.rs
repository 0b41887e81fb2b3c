//! resgal core library — domain types, the YAML site store, config, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`PlatformError`], [`ConfigError`]
//! - [`site`] — load / lookup / assign / save for a site file
//! - [`config`] — `~/.resgal/config.yaml`

pub mod config;
pub mod error;
pub mod site;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, PlatformError};
pub use site::{AccessMode, SiteStore};
pub use types::{
    Channel, ChannelPath, ChannelSnapshot, GalleryId, GroupName, ResourceGallery, RightsGrant,
    Role, Site,
};
