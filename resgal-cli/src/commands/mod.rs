pub mod run;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use resgal_core::config;

/// Where the site lives and which gallery namespace to use.
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Site file to reconcile. Defaults to `site` in ~/.resgal/config.yaml.
    #[arg(long, short = 's', value_name = "FILE")]
    pub site: Option<PathBuf>,

    /// Gallery namespace, e.g. "/Resources/Web authors".
    #[arg(long, value_name = "PATH")]
    pub prefix: Option<String>,
}

/// Flags merged over the user's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSite {
    pub site: PathBuf,
    pub prefix: String,
}

impl SiteArgs {
    pub fn resolve(&self, home: &Path) -> Result<ResolvedSite> {
        let cfg = config::load_at(home).context("failed to load ~/.resgal/config.yaml")?;
        let site = self
            .site
            .clone()
            .or(cfg.site)
            .context("no site file: pass --site or set `site` in ~/.resgal/config.yaml")?;
        let prefix = self.prefix.clone().unwrap_or(cfg.gallery_prefix);
        Ok(ResolvedSite { site, prefix })
    }
}

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}
