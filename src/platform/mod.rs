//! Platform layer: everything modules read from the running system.
//!
//! All paths are absolute device paths ("/proc/cpuinfo") resolved under a
//! configurable root, so the same modules run on a device (root "/") and
//! against fixture trees.

pub mod permission;
pub mod props;

pub use permission::{AllowAll, FsPermissionGate, Permission, PermissionGate, PermissionState};
pub use props::{Properties, PropertySource};

use crate::error::{ResolveError, ResolveResult};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct Platform {
    root: PathBuf,
    props: PropertySource,
    /// Properties are read once per platform snapshot.
    props_cache: OnceLock<ResolveResult<Properties>>,
}

impl Platform {
    pub fn new(root: impl Into<PathBuf>, props: PropertySource) -> Self {
        Self {
            root: root.into(),
            props,
            props_cache: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, device_path: &str) -> PathBuf {
        self.root.join(device_path.trim_start_matches('/'))
    }

    pub fn read(&self, device_path: &str) -> ResolveResult<String> {
        fs::read_to_string(self.path(device_path)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ResolveError::NotFound,
            _ => ResolveError::Io(format!("{}: {}", device_path, e)),
        })
    }

    /// Trimmed file content, `None` when unreadable or empty. Used for
    /// optional sysfs attributes.
    pub fn attr(&self, device_path: &str) -> Option<String> {
        self.read(device_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn attr_parse<T: std::str::FromStr>(&self, device_path: &str) -> Option<T> {
        self.attr(device_path).and_then(|s| s.parse().ok())
    }

    /// Entry names of a directory, numeric suffixes in number order
    /// (`thermal_zone2` before `thermal_zone10`).
    pub fn list_dir(&self, device_path: &str) -> ResolveResult<Vec<String>> {
        let entries = fs::read_dir(self.path(device_path)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ResolveError::NotFound,
            _ => ResolveError::Io(format!("{}: {}", device_path, e)),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ResolveError::Io(format!("{}: {}", device_path, e)))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort_by(|a, b| natural_key(a).cmp(&natural_key(b)));
        Ok(names)
    }

    pub fn properties(&self) -> ResolveResult<&Properties> {
        self.props_cache
            .get_or_init(|| self.props.load(&self.root))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn prop(&self, key: &str) -> Option<String> {
        self.properties()
            .ok()
            .and_then(|p| p.get(key))
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

/// `("thermal_zone", Some(10), name)` for `thermal_zone10`.
fn natural_key(name: &str) -> (&str, Option<u64>, &str) {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    (prefix, name[prefix.len()..].parse().ok(), name)
}
