//! Whole-tree export: resolve everything reachable from the root and encode it
//! as one JSON document.

pub mod json;
pub mod resolver;
pub mod tree;

pub use resolver::{Resolution, TreeResolver};
pub use tree::{DataNode, DataTree};

use crate::Result;
use crate::error::ResolveError;
use crate::modules::{Module, Registry};
use crate::resource::Identifier;

use anyhow::bail;
use serde_json::{Value as Json, json};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Resolver threads per wave; 0 means one per pending identifier.
    pub workers: usize,
    pub pretty: bool,
    /// Refuse to export unless every module permission is granted.
    pub require_permissions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            workers: 16,
            pretty: true,
            require_permissions: false,
        }
    }
}

#[derive(Debug)]
pub struct Export {
    /// The encoded document.
    pub json: String,
    pub errors: BTreeMap<Identifier, ResolveError>,
    pub resolved: usize,
}

impl Export {
    /// `{ "<uri>": { "code": ..., "message": ... } }`, sorted by identifier.
    pub fn error_log_json(&self) -> Json {
        let mut out = serde_json::Map::new();
        for (identifier, error) in &self.errors {
            out.insert(
                identifier.to_uri(),
                json!({ "code": error.code(), "message": error.to_string() }),
            );
        }
        Json::Object(out)
    }
}

pub fn export_json<M: Module>(registry: &Registry<M>, options: &ExportOptions) -> Result<Export> {
    if options.require_permissions {
        let denied = registry.denied_permissions();
        if !denied.is_empty() {
            let names: Vec<&str> = denied.iter().map(|p| p.name()).collect();
            bail!("permissions not granted: {}", names.join(", "));
        }
    }

    let Resolution {
        tree,
        errors,
        resolved,
    } = TreeResolver::new(registry, options.workers).resolve_tree()?;

    let json = json::encode(&json::to_json(&tree)?, options.pretty)?;
    info!(
        "exported {} resources ({} bytes), {} failed",
        resolved.len() - errors.len(),
        json.len(),
        errors.len()
    );

    Ok(Export {
        json,
        errors,
        resolved: resolved.len(),
    })
}
