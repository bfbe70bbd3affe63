//! The nested output tree an export pass writes into.

use crate::Result;
use crate::resource::{Identifier, Value};

use anyhow::bail;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DataNode {
    Null,
    Value(Value),
    Map(IndexMap<String, DataNode>),
}

impl DataNode {
    pub fn empty_map() -> Self {
        DataNode::Map(IndexMap::new())
    }
}

impl From<Value> for DataNode {
    fn from(value: Value) -> Self {
        DataNode::Value(value)
    }
}

/// Insertion-ordered tree keyed by `[module] + path`. Every location is
/// written at most once.
#[derive(Debug, Default)]
pub struct DataTree {
    root: Option<DataNode>,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `data` at the location of `identifier`.
    ///
    /// The root identifier sets the whole tree. Otherwise intermediate maps are
    /// created below the last segment; passing through a non-map node or
    /// writing over existing data fails.
    pub fn register(&mut self, identifier: &Identifier, data: DataNode) -> Result<()> {
        let path = identifier.tree_path();
        let Some((last, parents)) = path.split_last() else {
            if self.root.is_some() {
                bail!("data for {} already exists", identifier);
            }
            self.root = Some(data);
            return Ok(());
        };

        let mut node = self.root.get_or_insert_with(DataNode::empty_map);
        for (depth, segment) in parents.iter().enumerate() {
            let DataNode::Map(map) = node else {
                bail!(
                    "cannot write {}: {} is not a mapping",
                    identifier,
                    parents[..depth].join("/")
                );
            };
            node = map.entry(segment.to_string()).or_insert_with(DataNode::empty_map);
        }

        let DataNode::Map(map) = node else {
            bail!("cannot write {}: {} is not a mapping", identifier, parents.join("/"));
        };
        if map.contains_key(*last) {
            bail!("data for {} already exists", identifier);
        }
        map.insert(last.to_string(), data);
        Ok(())
    }

    /// The finished tree; an empty map when nothing was written.
    pub fn into_root(self) -> DataNode {
        self.root.unwrap_or_else(DataNode::empty_map)
    }
}
