//! Resource identifiers.
//!
//! Example:
//! athena://display/card0-HDMI-A-1
//!   => Identifier { module: Some("display"), path: ["card0-HDMI-A-1"] }
//!
//! We derive ordering and hashing so identifiers can be used in sets, maps and
//! the error log of an export pass.

use anyhow::bail;
use std::fmt;
use std::ops::Div;
use std::str::FromStr;

pub const SCHEME: &str = "athena";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// The module handling this resource, `None` for the root.
    pub module: Option<String>,
    pub path: Vec<String>,
}

impl Identifier {
    /// The root of the tree.
    pub const ROOT: Identifier = Identifier {
        module: None,
        path: Vec::new(),
    };

    pub fn new(module: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            module: Some(module.into()),
            path,
        }
    }

    /// The root resource of a module.
    pub fn module_root(module: impl Into<String>) -> Self {
        Self::new(module, Vec::new())
    }

    /// Location of this resource in the exported tree: the module followed by
    /// the path segments. Empty for the root.
    pub fn tree_path(&self) -> Vec<&str> {
        match &self.module {
            Some(module) => std::iter::once(module.as_str())
                .chain(self.path.iter().map(String::as_str))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn to_uri(&self) -> String {
        let mut uri = format!("{}://", SCHEME);
        if let Some(module) = &self.module {
            uri.push_str(module);
            for segment in &self.path {
                uri.push('/');
                uri.push_str(segment);
            }
        }
        uri
    }
}

impl Div<&str> for &Identifier {
    type Output = Identifier;

    fn div(self, segment: &str) -> Identifier {
        let mut path = self.path.clone();
        path.push(segment.to_string());
        Identifier {
            module: self.module.clone(),
            path,
        }
    }
}

impl Div<String> for &Identifier {
    type Output = Identifier;

    fn div(self, segment: String) -> Identifier {
        self / segment.as_str()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Identifier {
    type Err = anyhow::Error;

    /// Parse "athena://module/a/b". A URI without authority is the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((scheme, rest)) = s.split_once("://") else {
            bail!("not an identifier URI: {}", s);
        };
        if scheme != SCHEME {
            bail!("invalid scheme: {}", scheme);
        }

        let mut segments = rest.split('/').filter(|p| !p.is_empty());
        let Some(module) = segments.next() else {
            return Ok(Identifier::ROOT);
        };

        Ok(Identifier::new(module, segments.map(str::to_string).collect()))
    }
}
