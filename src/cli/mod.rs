//! Support code for the country-sync binary

pub mod output;

pub use output::SyncProgress;
