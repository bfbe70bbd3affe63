//! On-device diagnostics: modules read procfs, sysfs and system properties
//! into screens, and the exporter walks every screen reachable from the root
//! into a single JSON document.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod modules;
pub mod platform;
pub mod render;
pub mod resource;

pub type Result<T> = anyhow::Result<T>;
