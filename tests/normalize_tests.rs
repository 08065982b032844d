//! Correction and normalization tests over a realistic payload

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use country_sync::models::Identity;
use country_sync::source::CurrencyOverride;
use country_sync::{CorrectionTable, intern, normalize, parse_countries};

fn assert_unique<T: Identity>(items: &[Arc<T>]) {
    let mut seen = HashSet::new();
    for item in items {
        assert!(seen.insert(item.identity().to_string()), "duplicate {}", item.identity());
    }
}

#[test]
fn test_normalized_sets_are_unique_and_ordered() {
    let countries = parse_countries(common::COUNTRIES_JSON).unwrap();
    let entities = normalize(&countries);

    assert_unique(&entities.languages);
    assert_unique(&entities.currencies);
    assert_unique(&entities.regional_blocs);

    let languages: Vec<&str> = entities.languages.iter().map(|l| l.identity()).collect();
    assert_eq!(languages, vec!["por", "fra"]);
    let currencies: Vec<&str> = entities.currencies.iter().map(|c| c.identity()).collect();
    assert_eq!(currencies, vec!["EUR", "BRL", "XOF"]);
    let blocs: Vec<&str> = entities.regional_blocs.iter().map(|b| b.identity()).collect();
    assert_eq!(blocs, vec!["EU", "USAN", "AU"]);
}

#[test]
fn test_corrections_then_intern() {
    let mut countries = parse_countries(common::COUNTRIES_JSON).unwrap();
    let table = CorrectionTable::empty()
        .with_drop("CIV", "XOF")
        .with_override(CurrencyOverride::symbol("BRL", "R$ "));

    let report = table.apply(&mut countries);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.overridden, 1);
    assert!(countries[2].currencies.is_empty());

    let entities = normalize(&countries);
    assert_eq!(entities.currencies.len(), 2);
    assert_eq!(entities.currency("BRL").unwrap().symbol.as_deref(), Some("R$ "));

    intern(&mut countries, &entities);
    assert!(Arc::ptr_eq(&countries[0].languages[0], &countries[1].languages[0]));
    assert!(Arc::ptr_eq(&countries[1].currencies[0], entities.currency("BRL").unwrap()));
}

#[test]
fn test_normalize_empty_input() {
    let entities = normalize(&[]);
    assert!(entities.is_empty());
}
