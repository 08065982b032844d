//! Declarative fixes for known upstream data problems
//!
//! Rules are keyed by stable codes, never by list position, and are applied
//! right after a fetch so the per-country currency lists are clean before
//! normalization.

use crate::models::Country;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Remove one currency entry from one country's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDrop {
    /// Alpha-3 code of the country
    pub country: String,
    /// Code of the currency entry to remove (first occurrence)
    pub currency: String,
}

/// Replace the display name and/or symbol of a currency everywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOverride {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl CurrencyOverride {
    pub fn name(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: Some(name.to_string()),
            symbol: None,
        }
    }

    pub fn symbol(code: &str, symbol: &str) -> Self {
        Self {
            code: code.to_string(),
            name: None,
            symbol: Some(symbol.to_string()),
        }
    }
}

/// Outcome of applying a [`CorrectionTable`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Currency entries removed
    pub dropped: usize,
    /// Currency entries rewritten
    pub overridden: usize,
    /// Drop rules that matched nothing (possibly fixed upstream)
    pub unmatched_drops: Vec<CurrencyDrop>,
}

/// Ordered set of correction rules.
///
/// Drops run before overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionTable {
    pub drops: Vec<CurrencyDrop>,
    pub overrides: Vec<CurrencyOverride>,
}

/// Stray currency entries published upstream: placeholder `[D]` rows, the
/// `(none)` marker and one entry without a code
const DEFAULT_DROPS: [(&str, &str); 7] = [
    ("VGB", "[D]"),
    ("FSM", "[D]"),
    ("NRU", "(none)"),
    ("PLW", "(none)"),
    ("SGS", "(none)"),
    ("TLS", ""),
    ("ZWE", "(none)"),
];

impl Default for CorrectionTable {
    fn default() -> Self {
        Self {
            drops: DEFAULT_DROPS
                .iter()
                .map(|(country, currency)| CurrencyDrop {
                    country: country.to_string(),
                    currency: currency.to_string(),
                })
                .collect(),
            overrides: vec![
                CurrencyOverride::name("USD", "United States Dollar"),
                CurrencyOverride::symbol("ZAR", "R"),
                CurrencyOverride::name("ILS", "Israeli new shekel"),
            ],
        }
    }
}

impl CorrectionTable {
    /// A table without any rule
    pub fn empty() -> Self {
        Self {
            drops: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_drop(mut self, country: &str, currency: &str) -> Self {
        self.drops.push(CurrencyDrop {
            country: country.to_string(),
            currency: currency.to_string(),
        });
        self
    }

    pub fn with_override(mut self, rule: CurrencyOverride) -> Self {
        self.overrides.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.overrides.is_empty()
    }

    /// Apply every rule to `countries` in place
    pub fn apply(&self, countries: &mut [Country]) -> CorrectionReport {
        let mut report = CorrectionReport::default();

        for rule in &self.drops {
            let removed = countries
                .iter_mut()
                .find(|c| c.alpha3_code == rule.country)
                .and_then(|country| {
                    let index = country
                        .currencies
                        .iter()
                        .position(|cur| cur.code == rule.currency)?;
                    Some(country.currencies.remove(index))
                });

            match removed {
                Some(_) => {
                    debug!(country = %rule.country, currency = %rule.currency, "Dropped currency entry");
                    report.dropped += 1;
                }
                None => report.unmatched_drops.push(rule.clone()),
            }
        }

        for rule in &self.overrides {
            for currency in countries.iter_mut().flat_map(|c| c.currencies.iter_mut()) {
                if currency.code != rule.code {
                    continue;
                }
                let currency = Arc::make_mut(currency);
                if let Some(name) = &rule.name {
                    currency.name = Some(name.clone());
                }
                if let Some(symbol) = &rule.symbol {
                    currency.symbol = Some(symbol.clone());
                }
                report.overridden += 1;
            }
        }

        if !report.unmatched_drops.is_empty() {
            info!(
                unmatched = report.unmatched_drops.len(),
                "Some currency drop rules matched nothing"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;

    fn sample() -> Vec<Country> {
        vec![
            Country::new("VGB", "British Virgin Islands")
                .with_currency(Currency::new("[D]", "[D]", "$"))
                .with_currency(Currency::new("USD", "United States dollar", "$")),
            Country::new("ZAF", "South Africa").with_currency(Currency::new("ZAR", "South African rand", "Rs")),
            Country::new("USA", "United States").with_currency(Currency::new("USD", "United States dollar", "$")),
        ]
    }

    #[test]
    fn test_default_overrides() {
        let mut countries = sample();
        let report = CorrectionTable::default().apply(&mut countries);

        assert_eq!(report.overridden, 3);
        assert_eq!(countries[0].currencies.len(), 1);
        assert_eq!(countries[0].currencies[0].name.as_deref(), Some("United States Dollar"));
        assert_eq!(countries[1].currencies[0].symbol.as_deref(), Some("R"));
        assert_eq!(countries[1].currencies[0].name.as_deref(), Some("South African rand"));
    }

    #[test]
    fn test_default_drops() {
        let table = CorrectionTable::default();
        let drops: Vec<(&str, &str)> = table
            .drops
            .iter()
            .map(|d| (d.country.as_str(), d.currency.as_str()))
            .collect();
        assert_eq!(drops, DEFAULT_DROPS.to_vec());

        let mut countries = vec![
            Country::new("TLS", "Timor-Leste")
                .with_currency(Currency::new("USD", "United States dollar", "$"))
                .with_currency(Currency::default()),
            Country::new("ZWE", "Zimbabwe")
                .with_currency(Currency::new("BWP", "Botswana pula", "P"))
                .with_currency(Currency::new("(none)", "", "")),
        ];
        let report = table.apply(&mut countries);

        assert_eq!(report.dropped, 2);
        assert_eq!(report.unmatched_drops.len(), 5);
        assert_eq!(countries[0].currencies.len(), 1);
        assert_eq!(countries[0].currencies[0].code, "USD");
        assert_eq!(countries[1].currencies.len(), 1);
        assert_eq!(countries[1].currencies[0].code, "BWP");
    }

    #[test]
    fn test_drop_by_code_not_position() {
        let mut countries = sample();
        let table = CorrectionTable::empty()
            .with_drop("VGB", "[D]")
            .with_drop("FRA", "EUR");
        let report = table.apply(&mut countries);

        assert_eq!(report.dropped, 1);
        assert_eq!(report.unmatched_drops.len(), 1);
        assert_eq!(report.unmatched_drops[0].country, "FRA");
        assert_eq!(countries[0].currencies.len(), 1);
        assert_eq!(countries[0].currencies[0].code, "USD");
    }

    #[test]
    fn test_override_does_not_touch_shared_copies() {
        let shared = Arc::new(Currency::new("USD", "United States dollar", "$"));
        let mut countries = vec![Country::new("USA", "United States")];
        countries[0].currencies.push(Arc::clone(&shared));

        CorrectionTable::default().apply(&mut countries);

        assert_eq!(shared.name.as_deref(), Some("United States dollar"));
        assert_eq!(countries[0].currencies[0].name.as_deref(), Some("United States Dollar"));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml_str = r#"
            [[drops]]
            country = "VGB"
            currency = "[D]"

            [[overrides]]
            code = "ZAR"
            symbol = "R"
        "#;
        let table: CorrectionTable = toml::from_str(toml_str).unwrap();

        assert_eq!(table.drops.len(), 1);
        assert_eq!(table.overrides, vec![CurrencyOverride::symbol("ZAR", "R")]);
    }
}
