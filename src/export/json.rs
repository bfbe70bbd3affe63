//! Tree => JSON.

use crate::Result;
use crate::export::tree::DataNode;

use serde_json::{Map, Value as Json};

/// Insertion order of maps is kept.
pub fn to_json(node: &DataNode) -> Result<Json> {
    Ok(match node {
        DataNode::Null => Json::Null,
        DataNode::Value(value) => value.to_json()?,
        DataNode::Map(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                out.insert(key.clone(), to_json(child)?);
            }
            Json::Object(out)
        }
    })
}

pub fn encode(json: &Json, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(json)?
    } else {
        serde_json::to_string(json)?
    };
    Ok(text)
}
