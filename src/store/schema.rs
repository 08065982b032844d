//! Database schema definitions for the country cache

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Tables cleared by a destructive replace, every child table before the
/// table it refers to. `schema_info` is kept.
pub const TABLES_CHILD_FIRST: [&str; 17] = [
    "country_regional_bloc",
    "country_currency",
    "country_language",
    "country_timezone",
    "country_border",
    "translation",
    "lat_lng",
    "alt_spelling",
    "calling_code",
    "top_level_domain",
    "country",
    "regional_bloc_other_name",
    "regional_bloc_other_acronym",
    "regional_bloc",
    "currency",
    "language",
    "sync_info",
];

/// Per-country list tables: (table, value column)
pub const COUNTRY_LIST_TABLES: [(&str, &str); 5] = [
    ("top_level_domain", "top_level_domain"),
    ("calling_code", "calling_code"),
    ("alt_spelling", "alt_spelling"),
    ("country_border", "border_alpha3_code"),
    ("country_timezone", "timezone"),
];

/// Schema for the country cache tables
pub struct CountrySchema;

impl CountrySchema {
    /// Get the DDL for creating all tables (DuckDB syntax)
    ///
    /// Relations between tables are maintained by the writer, which inserts
    /// parents before children and deletes children before parents.
    pub fn create_tables() -> &'static str {
        r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_info (
    key VARCHAR PRIMARY KEY,
    value VARCHAR NOT NULL
);

-- Metadata of the last successful save
CREATE TABLE IF NOT EXISTS sync_info (
    key VARCHAR PRIMARY KEY,
    value VARCHAR NOT NULL
);

-- Shared entities, ordinal keeps first-seen order
CREATE TABLE IF NOT EXISTS language (
    iso639_2 VARCHAR PRIMARY KEY,
    ordinal INTEGER NOT NULL,
    iso639_1 VARCHAR,
    name VARCHAR NOT NULL,
    native_name VARCHAR
);

CREATE TABLE IF NOT EXISTS currency (
    code VARCHAR PRIMARY KEY,
    ordinal INTEGER NOT NULL,
    name VARCHAR,
    symbol VARCHAR
);

CREATE TABLE IF NOT EXISTS regional_bloc (
    acronym VARCHAR PRIMARY KEY,
    ordinal INTEGER NOT NULL,
    name VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS regional_bloc_other_acronym (
    regional_bloc_acronym VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    other_acronym VARCHAR NOT NULL,
    PRIMARY KEY (regional_bloc_acronym, ordinal)
);

CREATE TABLE IF NOT EXISTS regional_bloc_other_name (
    regional_bloc_acronym VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    other_name VARCHAR NOT NULL,
    PRIMARY KEY (regional_bloc_acronym, ordinal)
);

-- Countries
CREATE TABLE IF NOT EXISTS country (
    alpha3_code VARCHAR PRIMARY KEY,
    ordinal INTEGER NOT NULL,
    alpha2_code VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    capital VARCHAR NOT NULL,
    region VARCHAR NOT NULL,
    subregion VARCHAR NOT NULL,
    population BIGINT NOT NULL,
    demonym VARCHAR NOT NULL,
    area DOUBLE,
    gini DOUBLE,
    native_name VARCHAR NOT NULL,
    numeric_code VARCHAR NOT NULL,
    flag VARCHAR NOT NULL,
    cioc VARCHAR NOT NULL
);

-- Per-country lists
CREATE TABLE IF NOT EXISTS top_level_domain (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    top_level_domain VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS calling_code (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    calling_code VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS alt_spelling (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    alt_spelling VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS country_border (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    border_alpha3_code VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS country_timezone (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    timezone VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS lat_lng (
    country_alpha3_code VARCHAR PRIMARY KEY,
    lat DOUBLE NOT NULL,
    lng DOUBLE NOT NULL
);

CREATE TABLE IF NOT EXISTS translation (
    country_alpha3_code VARCHAR PRIMARY KEY,
    de VARCHAR,
    es VARCHAR,
    fr VARCHAR,
    ja VARCHAR,
    it VARCHAR,
    br VARCHAR,
    pt VARCHAR,
    nl VARCHAR,
    hr VARCHAR,
    fa VARCHAR
);

-- Many-to-many joins, ordinal keeps each country's list order
CREATE TABLE IF NOT EXISTS country_language (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    language_iso639_2 VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS country_currency (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    currency_code VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);

CREATE TABLE IF NOT EXISTS country_regional_bloc (
    country_alpha3_code VARCHAR NOT NULL,
    ordinal INTEGER NOT NULL,
    regional_bloc_acronym VARCHAR NOT NULL,
    PRIMARY KEY (country_alpha3_code, ordinal)
);
"#
    }

    /// Get the query for the schema version
    pub fn select_schema_version() -> &'static str {
        "SELECT value FROM schema_info WHERE key = 'version'"
    }
}
