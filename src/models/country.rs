//! Country model

use super::{
    Currency, Identity, Language, RegionalBloc, StructuralEq, Translations, null_as_default,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A country record as delivered by the remote source.
///
/// Text fields that are missing or `null` in the payload decode to an empty
/// string, list fields to an empty list. `area` and `gini` stay `None` when
/// unset. Shared sub-entities are held through `Arc` so that, once
/// normalized, every country points into the same run-owned sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-3 code, the identity
    #[serde(rename = "alpha3Code", default, deserialize_with = "null_as_default")]
    pub alpha3_code: String,
    #[serde(rename = "alpha2Code", default, deserialize_with = "null_as_default")]
    pub alpha2_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capital: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subregion: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub population: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demonym: String,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub gini: Option<f64>,
    #[serde(rename = "nativeName", default, deserialize_with = "null_as_default")]
    pub native_name: String,
    #[serde(rename = "numericCode", default, deserialize_with = "null_as_default")]
    pub numeric_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cioc: String,
    #[serde(rename = "topLevelDomain", default, deserialize_with = "null_as_default")]
    pub top_level_domain: Vec<String>,
    #[serde(rename = "callingCodes", default, deserialize_with = "null_as_default")]
    pub calling_codes: Vec<String>,
    #[serde(rename = "altSpellings", default, deserialize_with = "null_as_default")]
    pub alt_spellings: Vec<String>,
    /// Alpha-3 codes of neighbouring countries, not checked on load
    #[serde(default, deserialize_with = "null_as_default")]
    pub borders: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezones: Vec<String>,
    /// Either empty or `[lat, lng]`
    #[serde(default, deserialize_with = "null_as_default")]
    pub latlng: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Translations,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<Arc<Language>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: Vec<Arc<Currency>>,
    #[serde(rename = "regionalBlocs", default, deserialize_with = "null_as_default")]
    pub regional_blocs: Vec<Arc<RegionalBloc>>,
}

impl Country {
    pub fn new(alpha3_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alpha3_code: alpha3_code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Latitude and longitude, when both are present
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        match self.latlng.as_slice() {
            [lat, lng] => Some((*lat, *lng)),
            _ => None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.languages.push(Arc::new(language));
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currencies.push(Arc::new(currency));
        self
    }

    pub fn with_regional_bloc(mut self, bloc: RegionalBloc) -> Self {
        self.regional_blocs.push(Arc::new(bloc));
        self
    }
}

impl Identity for Country {
    fn identity(&self) -> &str {
        &self.alpha3_code
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.alpha3_code == other.alpha3_code
    }
}

impl Eq for Country {}

impl Hash for Country {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alpha3_code.hash(state);
    }
}

impl StructuralEq for Country {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.alpha3_code == other.alpha3_code
            && self.alpha2_code == other.alpha2_code
            && self.name == other.name
            && self.capital == other.capital
            && self.region == other.region
            && self.subregion == other.subregion
            && self.population == other.population
            && self.demonym == other.demonym
            && self.area == other.area
            && self.gini == other.gini
            && self.native_name == other.native_name
            && self.numeric_code == other.numeric_code
            && self.flag == other.flag
            && self.cioc == other.cioc
            && self.top_level_domain == other.top_level_domain
            && self.calling_codes == other.calling_codes
            && self.alt_spellings == other.alt_spellings
            && self.borders == other.borders
            && self.timezones == other.timezones
            && self.latlng == other.latlng
            && self.translations.structurally_eq(&other.translations)
            && self.languages.structurally_eq(&other.languages)
            && self.currencies.structurally_eq(&other.currencies)
            && self.regional_blocs.structurally_eq(&other.regional_blocs)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
