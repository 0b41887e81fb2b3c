//! `~/.resgal/config.yaml`.
//!
//! Functions take the home directory explicitly; the CLI resolves it once.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Namespace under which each group's gallery lives.
pub const DEFAULT_GALLERY_PREFIX: &str = "/Resources/Web authors";

/// User configuration. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site file used when `--site` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<PathBuf>,
    /// Prefix joined with a group name to address its gallery.
    pub gallery_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: None,
            gallery_prefix: DEFAULT_GALLERY_PREFIX.to_string(),
        }
    }
}

/// `<home>/.resgal/`
pub fn resgal_root(home: &Path) -> PathBuf {
    home.join(".resgal")
}

/// `<home>/.resgal/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    resgal_root(home).join("config.yaml")
}

/// Load the config, falling back to defaults when the file is absent.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// Atomically save the config (`.yaml.tmp` + rename).
pub fn save_at(home: &Path, config: &Config) -> Result<(), ConfigError> {
    let dir = resgal_root(home);
    std::fs::create_dir_all(&dir)?;
    let path = config_path_at(home);
    let tmp = dir.join("config.yaml.tmp");
    std::fs::write(&tmp, serde_yaml::to_string(config)?)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.gallery_prefix, DEFAULT_GALLERY_PREFIX);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let home = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(resgal_root(home.path())).unwrap();
        std::fs::write(config_path_at(home.path()), "site: /srv/site.yaml\n").unwrap();
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg.site, Some(PathBuf::from("/srv/site.yaml")));
        assert_eq!(cfg.gallery_prefix, DEFAULT_GALLERY_PREFIX);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().expect("tempdir");
        let cfg = Config {
            site: Some(PathBuf::from("/srv/site.yaml")),
            gallery_prefix: "/Galleries".to_string(),
        };
        save_at(home.path(), &cfg).expect("save");
        assert_eq!(load_at(home.path()).expect("load"), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let home = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(resgal_root(home.path())).unwrap();
        std::fs::write(config_path_at(home.path()), "gallery_prefix: [unclosed").unwrap();
        let err = load_at(home.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.yaml"));
    }
}
