//! Regional bloc model

use super::{Identity, StructuralEq, null_as_default};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A regional trade or political bloc, identified by its acronym
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionalBloc {
    #[serde(default, deserialize_with = "null_as_default")]
    pub acronym: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "otherAcronyms", default, deserialize_with = "null_as_default")]
    pub other_acronyms: Vec<String>,
    #[serde(rename = "otherNames", default, deserialize_with = "null_as_default")]
    pub other_names: Vec<String>,
}

impl RegionalBloc {
    pub fn new(acronym: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Identity for RegionalBloc {
    fn identity(&self) -> &str {
        &self.acronym
    }
}

impl PartialEq for RegionalBloc {
    fn eq(&self, other: &Self) -> bool {
        self.acronym == other.acronym
    }
}

impl Eq for RegionalBloc {}

impl Hash for RegionalBloc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.acronym.hash(state);
    }
}

impl StructuralEq for RegionalBloc {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.acronym == other.acronym
            && self.name == other.name
            && self.other_acronyms == other.other_acronyms
            && self.other_names == other.other_names
    }
}

impl fmt::Display for RegionalBloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
