//! Memory, block partitions and mounts.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::Platform;
use crate::resource::{Card, Identifier, Item, Resource, Screen, Text, Value};

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

pub struct StorageModule {
    platform: Arc<Platform>,
}

impl StorageModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn root(&self, identifier: &Identifier) -> ResolveResult<Screen> {
        let meminfo = parse_meminfo(&self.platform.read("/proc/meminfo")?);
        let bytes = |key: &str| meminfo.get(key).copied().map(Value::bytes);

        let memory = Card::new(
            "memory",
            Text::key("storage_memory"),
            vec![
                Item::new("total", Text::key("storage_total")).maybe_value(bytes("MemTotal")),
                Item::new("free", Text::key("storage_free")).maybe_value(bytes("MemFree")),
                Item::new("available", Text::key("storage_available"))
                    .maybe_value(bytes("MemAvailable")),
                Item::new("cached", Text::key("storage_cached")).maybe_value(bytes("Cached")),
                Item::new("swap_total", Text::key("storage_swap_total"))
                    .maybe_value(bytes("SwapTotal")),
                Item::new("swap_free", Text::key("storage_swap_free"))
                    .maybe_value(bytes("SwapFree")),
            ],
        );

        Ok(Screen::card_list(
            identifier.clone(),
            self.name(),
            vec![
                memory,
                Card::new("partitions", Text::key("storage_partitions"), vec![])
                    .navigate_to(identifier / "partitions"),
                Card::new("mounts", Text::key("storage_mounts"), vec![])
                    .navigate_to(identifier / "mounts"),
            ],
        ))
    }

    fn partitions(&self, identifier: &Identifier) -> ResolveResult<Screen> {
        let items = parse_partitions(&self.platform.read("/proc/partitions")?)?
            .into_iter()
            .map(|(name, bytes)| Item::new(&name, Text::literal(&name)).value(Value::bytes(bytes)))
            .collect();
        Ok(Screen::item_list(identifier.clone(), Text::key("storage_partitions"), items))
    }

    fn mounts(&self, identifier: &Identifier) -> ResolveResult<Screen> {
        let items = parse_mounts(&self.platform.read("/proc/mounts")?)
            .into_iter()
            .map(|(target, mount)| {
                Item::new(&target, Text::literal(&target))
                    .value(format!("{} {} ({})", mount.source, mount.fstype, mount.options))
            })
            .collect();
        Ok(Screen::item_list(identifier.clone(), Text::key("storage_mounts"), items))
    }
}

impl Module for StorageModule {
    fn id(&self) -> &str {
        "storage"
    }

    fn name(&self) -> Text {
        Text::key("storage")
    }

    fn description(&self) -> Text {
        Text::key("storage_description")
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let screen = match (segment(identifier, 0), identifier.path.len()) {
            (None, _) => self.root(identifier)?,
            (Some("partitions"), 1) => self.partitions(identifier)?,
            (Some("mounts"), 1) => self.mounts(identifier)?,
            _ => return Err(ResolveError::NotFound),
        };
        Ok(screen.into())
    }
}

/// `/proc/meminfo` fields in bytes. Values without a unit are skipped.
fn parse_meminfo(text: &str) -> HashMap<String, u64> {
    let mut out = HashMap::new();
    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        if let (Some(value), Some("kB")) = (parts.next(), parts.next()) {
            if let Ok(kb) = value.parse::<u64>() {
                out.insert(key.trim().to_string(), kb.saturating_mul(1024));
            }
        }
    }
    out
}

/// `/proc/partitions` rows as (name, size in bytes).
///
/// major minor  #blocks  name
///
///  254        0    2097152 zram0
fn parse_partitions(text: &str) -> ResolveResult<Vec<(String, u64)>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() || fields[0] == "major" {
            continue;
        }
        let [_, _, blocks, name] = &fields[..] else {
            return Err(ResolveError::Deserialization(format!(
                "/proc/partitions:{}: expected 4 fields, got {:?}",
                lineno + 1,
                line
            )));
        };
        let blocks: u64 = blocks.parse().map_err(|_| {
            ResolveError::Deserialization(format!(
                "/proc/partitions:{}: bad block count {:?}",
                lineno + 1,
                blocks
            ))
        })?;
        // 1 KiB blocks.
        out.push((name.to_string(), blocks.saturating_mul(1024)));
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
struct Mount {
    source: String,
    fstype: String,
    options: String,
}

/// `/proc/mounts` keyed by mount point. A later mount on the same point hides
/// the earlier one and replaces it.
fn parse_mounts(text: &str) -> IndexMap<String, Mount> {
    let mut out = IndexMap::new();
    for (lineno, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [source, target, fstype, options, ..] = &fields[..] else {
            if !line.trim().is_empty() {
                warn!("/proc/mounts:{}: skipping {:?}", lineno + 1, line);
            }
            continue;
        };
        out.insert(
            unescape_octal(target),
            Mount {
                source: source.to_string(),
                fstype: fstype.to_string(),
                options: options.to_string(),
            },
        );
    }
    out
}

/// The kernel escapes spaces and friends as `\040`.
fn unescape_octal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 4).and_then(|o| u8::from_str_radix(o, 8).ok());
        match code {
            Some(byte) => {
                out.push(byte as char);
                rest = &rest[pos + 4..];
            }
            None => {
                out.push('\\');
                rest = &rest[pos + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}
