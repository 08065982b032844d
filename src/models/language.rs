//! Language model

use super::{Identity, StructuralEq, null_as_default};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A spoken language, identified by its ISO 639-2 code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Language {
    /// Short form (ISO 639-1), absent for some languages
    #[serde(rename = "iso639_1", default)]
    pub iso639_1: Option<String>,
    /// Long form (ISO 639-2), the identity
    #[serde(rename = "iso639_2", default, deserialize_with = "null_as_default")]
    pub iso639_2: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "nativeName", default)]
    pub native_name: Option<String>,
}

impl Language {
    pub fn new(iso639_2: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            iso639_2: iso639_2.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_iso639_1(mut self, code: impl Into<String>) -> Self {
        self.iso639_1 = Some(code.into());
        self
    }

    pub fn with_native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = Some(native_name.into());
        self
    }
}

impl Identity for Language {
    fn identity(&self) -> &str {
        &self.iso639_2
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.iso639_2 == other.iso639_2
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.iso639_2.hash(state);
    }
}

impl StructuralEq for Language {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.iso639_1 == other.iso639_1
            && self.iso639_2 == other.iso639_2
            && self.name == other.name
            && self.native_name == other.native_name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
