//! Currency model

use super::{Identity, StructuralEq, null_as_default};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A currency, identified by its code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: Some(name.into()),
            symbol: Some(symbol.into()),
        }
    }
}

impl Identity for Currency {
    fn identity(&self) -> &str {
        &self.code
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl StructuralEq for Currency {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.code == other.code && self.name == other.name && self.symbol == other.symbol
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.code),
        }
    }
}
