//! Capabilities modules need before they can resolve anything.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ReadPowerSupplies,
    ReadInputDevices,
    ReadThermalZones,
    ReadDisplayConnectors,
}

impl Permission {
    /// Kernel interface the permission stands for.
    pub fn backing_path(self) -> &'static str {
        match self {
            Permission::ReadPowerSupplies => "/sys/class/power_supply",
            Permission::ReadInputDevices => "/proc/bus/input/devices",
            Permission::ReadThermalZones => "/sys/class/thermal",
            Permission::ReadDisplayConnectors => "/sys/class/drm",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::ReadPowerSupplies => "read_power_supplies",
            Permission::ReadInputDevices => "read_input_devices",
            Permission::ReadThermalZones => "read_thermal_zones",
            Permission::ReadDisplayConnectors => "read_display_connectors",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

pub trait PermissionGate: Send + Sync {
    fn state(&self, permission: Permission) -> PermissionState;
}

/// Grants a permission when its backing path can be opened under the platform
/// root. A missing path is granted: the hardware is absent, which modules
/// report on their own.
#[derive(Debug, Clone)]
pub struct FsPermissionGate {
    root: PathBuf,
}

impl FsPermissionGate {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PermissionGate for FsPermissionGate {
    fn state(&self, permission: Permission) -> PermissionState {
        let path = self.root.join(permission.backing_path().trim_start_matches('/'));
        match readable(&path) {
            Ok(()) => PermissionState::Granted,
            Err(kind) if kind == ErrorKind::NotFound => PermissionState::Granted,
            Err(_) => PermissionState::Denied,
        }
    }
}

fn readable(path: &Path) -> Result<(), ErrorKind> {
    let meta = fs::metadata(path).map_err(|e| e.kind())?;
    if meta.is_dir() {
        fs::read_dir(path).map(|_| ()).map_err(|e| e.kind())
    } else {
        fs::File::open(path).map(|_| ()).map_err(|e| e.kind())
    }
}

/// Grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn state(&self, _: Permission) -> PermissionState {
        PermissionState::Granted
    }
}
