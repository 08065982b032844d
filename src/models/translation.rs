//! Localized country names

use super::StructuralEq;
use serde::{Deserialize, Serialize};

/// Language codes with a localized name slot, in storage column order
pub const TRANSLATION_CODES: [&str; 10] = ["de", "es", "fr", "ja", "it", "br", "pt", "nl", "hr", "fa"];

/// One localized name per supported language code.
///
/// A missing entry is `None`, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    #[serde(default)]
    pub de: Option<String>,
    #[serde(default)]
    pub es: Option<String>,
    #[serde(default)]
    pub fr: Option<String>,
    #[serde(default)]
    pub ja: Option<String>,
    #[serde(default)]
    pub it: Option<String>,
    #[serde(default)]
    pub br: Option<String>,
    #[serde(default)]
    pub pt: Option<String>,
    #[serde(default)]
    pub nl: Option<String>,
    #[serde(default)]
    pub hr: Option<String>,
    #[serde(default)]
    pub fa: Option<String>,
}

impl Translations {
    /// Localized name for `code`, if the code is supported and the entry present
    pub fn get(&self, code: &str) -> Option<&str> {
        self.slot(code).and_then(|s| s.as_deref())
    }

    /// Set the entry for `code`; returns false for an unsupported code
    pub fn set(&mut self, code: &str, value: Option<String>) -> bool {
        match self.slot_mut(code) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Entries in [`TRANSLATION_CODES`] order
    pub fn entries(&self) -> [(&'static str, Option<&str>); 10] {
        TRANSLATION_CODES.map(|code| (code, self.get(code)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| value.is_none())
    }

    fn slot(&self, code: &str) -> Option<&Option<String>> {
        Some(match code {
            "de" => &self.de,
            "es" => &self.es,
            "fr" => &self.fr,
            "ja" => &self.ja,
            "it" => &self.it,
            "br" => &self.br,
            "pt" => &self.pt,
            "nl" => &self.nl,
            "hr" => &self.hr,
            "fa" => &self.fa,
            _ => return None,
        })
    }

    fn slot_mut(&mut self, code: &str) -> Option<&mut Option<String>> {
        Some(match code {
            "de" => &mut self.de,
            "es" => &mut self.es,
            "fr" => &mut self.fr,
            "ja" => &mut self.ja,
            "it" => &mut self.it,
            "br" => &mut self.br,
            "pt" => &mut self.pt,
            "nl" => &mut self.nl,
            "hr" => &mut self.hr,
            "fa" => &mut self.fa,
            _ => return None,
        })
    }
}

impl StructuralEq for Translations {
    fn structurally_eq(&self, other: &Self) -> bool {
        self == other
    }
}
