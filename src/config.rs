//! Probe configuration, read from a TOML file.
//!
//! Example:
//!
//! ```toml
//! root = "/mnt/device"
//! getprop = ""
//! prop_files = ["/system/build.prop"]
//! workers = 4
//! require_permissions = true
//! pretty = false
//! ```

use crate::Result;
use crate::export::ExportOptions;
use crate::platform::{Platform, PropertySource};

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Directory `/proc`, `/sys` and property files are read under.
    pub root: PathBuf,

    /// Property command; empty disables it. When unset, the default command
    /// runs only with root "/", since the live properties would not match an
    /// image mounted elsewhere.
    pub getprop: Option<String>,

    /// Property files read when the command is unavailable.
    pub prop_files: Vec<String>,

    /// Resolver threads per wave, 0 for one per pending identifier.
    pub workers: usize,

    pub require_permissions: bool,

    pub pretty: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let export = ExportOptions::default();
        Self {
            root: PathBuf::from("/"),
            getprop: None,
            prop_files: PropertySource::default().files,
            workers: export.workers,
            require_permissions: export.require_permissions,
            pretty: export.pretty,
        }
    }
}

impl ProbeConfig {
    /// Load config from disk, or return the defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: ProbeConfig = toml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn property_source(&self) -> PropertySource {
        let getprop = match &self.getprop {
            Some(cmd) => Some(cmd.trim()).filter(|cmd| !cmd.is_empty()).map(str::to_string),
            None if self.root == Path::new("/") => PropertySource::default().getprop,
            None => None,
        };
        PropertySource {
            getprop,
            files: self.prop_files.clone(),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(&self.root, self.property_source())
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            workers: self.workers,
            pretty: self.pretty,
            require_permissions: self.require_permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProbeConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ProbeConfig::default());
        assert_eq!(config.property_source().getprop.as_deref(), Some("getprop"));
        assert_eq!(config.workers, 16);
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("athena.toml");
        std::fs::write(
            &path,
            "root = \"/mnt/device\"\ngetprop = \"\"\nworkers = 0\npretty = false\n",
        )
        .unwrap();

        let config = ProbeConfig::load(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("/mnt/device"));
        assert_eq!(config.property_source().getprop, None);
        assert_eq!(config.prop_files, ProbeConfig::default().prop_files);

        let options = config.export_options();
        assert_eq!(options.workers, 0);
        assert!(!options.pretty);
        assert!(!options.require_permissions);
    }

    #[test]
    fn getprop_follows_root_unless_set() {
        let mut config = ProbeConfig {
            root: PathBuf::from("/mnt/device"),
            ..Default::default()
        };
        assert_eq!(config.property_source().getprop, None);

        config.getprop = Some("/mnt/device/system/bin/getprop".into());
        assert_eq!(
            config.property_source().getprop.as_deref(),
            Some("/mnt/device/system/bin/getprop")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("athena.toml");
        std::fs::write(&path, "wokers = 3\n").unwrap();
        let err = ProbeConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config file"));
    }
}
