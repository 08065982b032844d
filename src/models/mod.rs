//! Entity model
//!
//! Value types for a country and the sub-entities it shares with other
//! countries (languages, currencies, regional blocs).
//!
//! Equality and hashing on every entity are keyed on its identity field only.
//! Full-field comparison is available separately through [`StructuralEq`].

pub mod country;
pub mod currency;
pub mod language;
pub mod regional_bloc;
pub mod translation;

pub use country::Country;
pub use currency::Currency;
pub use language::Language;
pub use regional_bloc::RegionalBloc;
pub use translation::{TRANSLATION_CODES, Translations};

use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// An entity with a single identity field
pub trait Identity {
    /// The value that determines equality and set membership
    fn identity(&self) -> &str;
}

impl<T: Identity + ?Sized> Identity for Arc<T> {
    fn identity(&self) -> &str {
        (**self).identity()
    }
}

/// Full-field comparison, independent of identity equality
pub trait StructuralEq {
    fn structurally_eq(&self, other: &Self) -> bool;
}

impl<T: StructuralEq + ?Sized> StructuralEq for Arc<T> {
    fn structurally_eq(&self, other: &Self) -> bool {
        (**self).structurally_eq(other)
    }
}

impl<T: StructuralEq> StructuralEq for [T] {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.structurally_eq(b))
    }
}

impl<T: StructuralEq> StructuralEq for Vec<T> {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.as_slice().structurally_eq(other.as_slice())
    }
}

/// Decode an explicit JSON `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
