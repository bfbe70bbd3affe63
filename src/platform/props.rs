//! System property sources: the `getprop` tool and build.prop-style files.

use crate::error::{ResolveError, ResolveResult};

use regex::Regex;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, warn};

// [key]: [value]
static GETPROP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\[([^\]]+)\]:\s*\[(.*)\]\s*$"#).expect("valid getprop regex"));

/// Properties sorted by key.
pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct PropertySource {
    /// Command printing `[key]: [value]` lines. `None` disables it.
    pub getprop: Option<String>,
    /// Files read under the platform root when `getprop` is unavailable.
    /// Later files override earlier ones.
    pub files: Vec<String>,
}

impl Default for PropertySource {
    fn default() -> Self {
        Self {
            getprop: Some("getprop".to_string()),
            files: vec![
                "/system/build.prop".to_string(),
                "/vendor/build.prop".to_string(),
                "/product/etc/build.prop".to_string(),
            ],
        }
    }
}

impl PropertySource {
    pub fn load(&self, root: &Path) -> ResolveResult<Properties> {
        if let Some(cmd) = &self.getprop {
            match Command::new(cmd).output() {
                Ok(output) if output.status.success() => {
                    return Ok(parse_getprop_output(&String::from_utf8_lossy(&output.stdout)));
                }
                Ok(output) => {
                    return Err(ResolveError::Subprocess(format!(
                        "{} exited with {}: {}",
                        cmd,
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("{} not available, reading property files", cmd);
                }
                Err(e) => return Err(ResolveError::Subprocess(format!("{}: {}", cmd, e))),
            }
        }

        let mut props = Properties::new();
        for file in &self.files {
            let path = root.join(file.trim_start_matches('/'));
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(ResolveError::Io(format!("{}: {}", path.display(), e))),
            };
            parse_prop_file(&mut props, &text, file);
        }
        Ok(props)
    }
}

/// Parse `getprop` output.
///
/// Expected lines:
/// [ro.build.type]: [user]
///
/// Values spanning several lines are not representable in this format and are
/// skipped with a warning.
pub fn parse_getprop_output(text: &str) -> Properties {
    let mut out = Properties::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match GETPROP_LINE.captures(line) {
            Some(caps) => {
                out.insert(caps[1].to_string(), caps[2].to_string());
            }
            None => warn!("getprop output line {}: cannot parse {:?}", lineno + 1, line),
        }
    }
    out
}

/// Parse a build.prop file into `props`: `key=value`, `#` comments, blank
/// lines. `key?=value` only sets a key no earlier line or file has set.
/// Malformed lines are skipped with a warning.
pub fn parse_prop_file(props: &mut Properties, text: &str, origin: &str) {
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // "import" directives reference other files; not properties.
        if line.starts_with("import ") {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!("{}:{}: expected key=value, got {:?}", origin, lineno + 1, line);
            continue;
        };
        let value = value.trim().to_string();
        match key.trim().strip_suffix('?') {
            Some(key) => {
                props.entry(key.trim().to_string()).or_insert(value);
            }
            None => {
                props.insert(key.trim().to_string(), value);
            }
        }
    }
}
