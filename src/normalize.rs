//! Extraction of shared sub-entities into distinct sets
//!
//! Every country from the remote source embeds full copies of its languages,
//! currencies and regional blocs. [`normalize`] collects the distinct entities
//! by identity, in first-seen order across the whole country list, and
//! [`intern`] points each country at the shared copies.

use crate::models::{Country, Currency, Identity, Language, RegionalBloc, StructuralEq};
use std::sync::Arc;
use tracing::debug;

/// Distinct shared entities of one synchronization run
#[derive(Debug, Clone, Default)]
pub struct NormalizedEntities {
    pub languages: Vec<Arc<Language>>,
    pub currencies: Vec<Arc<Currency>>,
    pub regional_blocs: Vec<Arc<RegionalBloc>>,
}

impl NormalizedEntities {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.currencies.is_empty() && self.regional_blocs.is_empty()
    }

    pub fn language(&self, iso639_2: &str) -> Option<&Arc<Language>> {
        find(&self.languages, iso639_2)
    }

    pub fn currency(&self, code: &str) -> Option<&Arc<Currency>> {
        find(&self.currencies, code)
    }

    pub fn regional_bloc(&self, acronym: &str) -> Option<&Arc<RegionalBloc>> {
        find(&self.regional_blocs, acronym)
    }
}

/// Collect the distinct languages, currencies and regional blocs.
///
/// Membership is decided by identity alone with a linear scan, which is fine
/// for a few hundred countries. The first copy seen wins.
pub fn normalize(countries: &[Country]) -> NormalizedEntities {
    let mut entities = NormalizedEntities::default();

    for country in countries {
        for language in &country.languages {
            push_distinct(&mut entities.languages, language, "language");
        }
        for currency in &country.currencies {
            push_distinct(&mut entities.currencies, currency, "currency");
        }
        for bloc in &country.regional_blocs {
            push_distinct(&mut entities.regional_blocs, bloc, "regional bloc");
        }
    }

    debug!(
        countries = countries.len(),
        languages = entities.languages.len(),
        currencies = entities.currencies.len(),
        regional_blocs = entities.regional_blocs.len(),
        "Normalized shared entities"
    );

    entities
}

/// Replace every embedded copy with the shared handle from `entities`.
///
/// Entries whose identity is not present in `entities` are left untouched.
pub fn intern(countries: &mut [Country], entities: &NormalizedEntities) {
    for country in countries.iter_mut() {
        for language in country.languages.iter_mut() {
            if let Some(shared) = entities.language(language.identity()) {
                *language = Arc::clone(shared);
            }
        }
        for currency in country.currencies.iter_mut() {
            if let Some(shared) = entities.currency(currency.identity()) {
                *currency = Arc::clone(shared);
            }
        }
        for bloc in country.regional_blocs.iter_mut() {
            if let Some(shared) = entities.regional_bloc(bloc.identity()) {
                *bloc = Arc::clone(shared);
            }
        }
    }
}

fn push_distinct<T>(set: &mut Vec<Arc<T>>, item: &Arc<T>, kind: &str)
where
    T: Identity + StructuralEq,
{
    match set.iter().find(|seen| seen.identity() == item.identity()) {
        Some(seen) => {
            if !seen.structurally_eq(item) {
                debug!(kind, identity = item.identity(), "Conflicting copies, keeping first seen");
            }
        }
        None => set.push(Arc::clone(item)),
    }
}

fn find<'a, T: Identity>(set: &'a [Arc<T>], identity: &str) -> Option<&'a Arc<T>> {
    set.iter().find(|entry| entry.identity() == identity)
}
