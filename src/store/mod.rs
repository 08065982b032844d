//! Persistent country cache
//!
//! The cache is a relational layout in an embedded DuckDB file. Shared
//! languages, currencies and regional blocs are stored once and joined to
//! countries through ordered link tables.

mod db;
mod error;
pub mod schema;

pub use db::{CountryDb, SaveSummary, SyncInfo};
pub use error::StoreError;
pub use schema::{CountrySchema, SCHEMA_VERSION};
