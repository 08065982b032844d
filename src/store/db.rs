//! Country cache database implementation

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::StoreError;
use super::schema::{COUNTRY_LIST_TABLES, CountrySchema, SCHEMA_VERSION, TABLES_CHILD_FIRST};
use crate::models::{
    Country, Currency, Identity, Language, RegionalBloc, TRANSLATION_CODES, Translations,
};
use crate::normalize::{NormalizedEntities, normalize};
use crate::progress::{ProgressReport, ProgressSink, ProgressStage, percentage};

/// Summary of a completed save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub run_id: Uuid,
    pub countries: usize,
    pub languages: usize,
    pub currencies: usize,
    pub regional_blocs: usize,
    pub duration_ms: u64,
}

/// Metadata recorded by the last successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub run_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub country_count: usize,
}

/// Country cache backed by an embedded DuckDB file.
///
/// Writes are a destructive replace: `save` clears every table and inserts
/// the new snapshot. The clear and the insert are committed separately, so an
/// interrupted save leaves the cache empty or partially filled; calling
/// `save` again from scratch is the recovery path.
pub struct CountryDb {
    conn: Connection,
    path: Option<PathBuf>,
}

impl CountryDb {
    /// Open or create a cache database at the given path.
    ///
    /// Missing parent directories are created and the schema is initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.init()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn, path: None };
        db.init()?;
        Ok(db)
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create missing tables and check the schema version
    pub fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(CountrySchema::create_tables())?;

        match self.stored_schema_version()? {
            Some(found) if found != SCHEMA_VERSION => Err(StoreError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            }),
            Some(_) => Ok(()),
            None => {
                self.conn.execute(
                    "INSERT INTO schema_info (key, value) VALUES ('version', ?)",
                    [SCHEMA_VERSION.to_string()],
                )?;
                Ok(())
            }
        }
    }

    /// Get the schema version
    pub fn schema_version(&self) -> Result<i32, StoreError> {
        self.stored_schema_version()?
            .ok_or_else(|| StoreError::Database("Schema version not recorded".to_string()))
    }

    fn stored_schema_version(&self) -> Result<Option<i32>, StoreError> {
        let result = self
            .conn
            .query_row(CountrySchema::select_schema_version(), [], |row| {
                row.get::<_, String>(0)
            });

        match result {
            Ok(version) => version
                .parse()
                .map(Some)
                .map_err(|_| StoreError::Database("Invalid schema version".to_string())),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of cached countries
    pub fn country_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM country", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every cached row, child tables first
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        delete_all(&tx)?;
        tx.commit()?;
        debug!("Cleared country cache");
        Ok(())
    }

    /// Replace the cached snapshot with `countries`.
    ///
    /// The snapshot is checked first, then the delete and every insert run in
    /// one transaction: on any error the previous snapshot stays in place.
    /// The shared entities are normalized here and written before the
    /// countries that refer to them. Progress is reported after each entity
    /// group and after each country. An empty snapshot records no
    /// `sync_info`.
    pub fn save(
        &mut self,
        countries: &[Country],
        progress: &dyn ProgressSink,
    ) -> Result<SaveSummary, StoreError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        validate_snapshot(countries)?;
        let entities = normalize(countries);
        let total = countries.len();

        self.init()?;

        let tx = self.conn.transaction()?;
        delete_all(&tx)?;

        insert_regional_blocs(&tx, &entities)?;
        progress.report(ProgressReport::new(ProgressStage::RegionalBlocs, percentage(0, total)));

        insert_languages(&tx, &entities)?;
        progress.report(ProgressReport::new(ProgressStage::Languages, percentage(0, total)));

        insert_currencies(&tx, &entities)?;
        progress.report(ProgressReport::new(ProgressStage::Currencies, percentage(0, total)));

        for (index, country) in countries.iter().enumerate() {
            insert_country(&tx, index, country)?;
            progress.report(ProgressReport::new(
                ProgressStage::CountrySaved,
                percentage(index + 1, total),
            ));
        }

        if total > 0 {
            write_sync_info(&tx, run_id, total)?;
        }
        tx.commit()?;

        let summary = SaveSummary {
            run_id,
            countries: total,
            languages: entities.languages.len(),
            currencies: entities.currencies.len(),
            regional_blocs: entities.regional_blocs.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            run_id = %run_id,
            countries = summary.countries,
            languages = summary.languages,
            currencies = summary.currencies,
            regional_blocs = summary.regional_blocs,
            duration_ms = summary.duration_ms,
            "Saved country cache"
        );

        Ok(summary)
    }

    /// Rebuild every cached country.
    ///
    /// Shared entities are loaded once and every country refers to the same
    /// handles. A never-written cache yields an empty list. The last progress
    /// report carries the loaded snapshot.
    pub fn load(&self, progress: &dyn ProgressSink) -> Result<Vec<Country>, StoreError> {
        let start = Instant::now();
        self.init()?;

        let entities = self.load_entities()?;
        let languages = index_by_identity(&entities.languages);
        let currencies = index_by_identity(&entities.currencies);
        let blocs = index_by_identity(&entities.regional_blocs);

        let mut lists: Vec<HashMap<String, Vec<String>>> = Vec::with_capacity(COUNTRY_LIST_TABLES.len());
        for (table, column) in COUNTRY_LIST_TABLES {
            lists.push(self.load_grouped(table, "country_alpha3_code", column)?);
        }
        let language_refs = self.load_grouped("country_language", "country_alpha3_code", "language_iso639_2")?;
        let currency_refs = self.load_grouped("country_currency", "country_alpha3_code", "currency_code")?;
        let bloc_refs = self.load_grouped("country_regional_bloc", "country_alpha3_code", "regional_bloc_acronym")?;
        let lat_lngs = self.load_lat_lngs()?;
        let mut translations = self.load_translations()?;

        let mut countries = self.load_country_rows()?;
        let total = countries.len();

        for (index, country) in countries.iter_mut().enumerate() {
            let code = country.alpha3_code.clone();
            let mut take = |i: usize| lists[i].remove(&code).unwrap_or_default();

            country.top_level_domain = take(0);
            country.calling_codes = take(1);
            country.alt_spellings = take(2);
            country.borders = take(3);
            country.timezones = take(4);
            country.latlng = lat_lngs
                .get(&code)
                .map(|(lat, lng)| vec![*lat, *lng])
                .unwrap_or_default();
            country.translations = translations.remove(&code).unwrap_or_default();
            country.languages = resolve(&code, language_refs.get(&code), &languages, "language")?;
            country.currencies = resolve(&code, currency_refs.get(&code), &currencies, "currency")?;
            country.regional_blocs = resolve(&code, bloc_refs.get(&code), &blocs, "regional bloc")?;

            if index + 1 < total {
                progress.report(ProgressReport::new(
                    ProgressStage::CountryLoaded,
                    percentage(index + 1, total),
                ));
            }
        }

        if total > 0 {
            progress.report(
                ProgressReport::new(ProgressStage::CountryLoaded, 100).with_countries(countries.clone()),
            );
        }

        info!(
            countries = total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Loaded country cache"
        );

        Ok(countries)
    }

    /// Metadata of the last successful save, if any
    pub fn sync_info(&self) -> Result<Option<SyncInfo>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM sync_info")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut values = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }

        if values.is_empty() {
            return Ok(None);
        }

        let field = |key: &str| {
            values
                .get(key)
                .ok_or_else(|| StoreError::InvalidData(format!("sync_info is missing '{}'", key)))
        };

        let run_id = Uuid::parse_str(field("run_id")?)
            .map_err(|e| StoreError::InvalidData(format!("Invalid run id: {}", e)))?;
        let saved_at = DateTime::parse_from_rfc3339(field("saved_at")?)
            .map_err(|e| StoreError::InvalidData(format!("Invalid save timestamp: {}", e)))?
            .with_timezone(&Utc);
        let country_count = field("country_count")?
            .parse()
            .map_err(|_| StoreError::InvalidData("Invalid country count".to_string()))?;

        Ok(Some(SyncInfo {
            run_id,
            saved_at,
            country_count,
        }))
    }

    fn load_entities(&self) -> Result<NormalizedEntities, StoreError> {
        let mut entities = NormalizedEntities::default();

        let mut stmt = self.conn.prepare(
            "SELECT iso639_2, iso639_1, name, native_name FROM language ORDER BY ordinal",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Language {
                iso639_2: row.get(0)?,
                iso639_1: row.get(1)?,
                name: row.get(2)?,
                native_name: row.get(3)?,
            })
        })?;
        for row in rows {
            entities.languages.push(Arc::new(row?));
        }

        let mut stmt = self
            .conn
            .prepare("SELECT code, name, symbol FROM currency ORDER BY ordinal")?;
        let rows = stmt.query_map([], |row| {
            Ok(Currency {
                code: row.get(0)?,
                name: row.get(1)?,
                symbol: row.get(2)?,
            })
        })?;
        for row in rows {
            entities.currencies.push(Arc::new(row?));
        }

        let mut other_acronyms = self.load_grouped(
            "regional_bloc_other_acronym",
            "regional_bloc_acronym",
            "other_acronym",
        )?;
        let mut other_names =
            self.load_grouped("regional_bloc_other_name", "regional_bloc_acronym", "other_name")?;

        let mut stmt = self
            .conn
            .prepare("SELECT acronym, name FROM regional_bloc ORDER BY ordinal")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (acronym, name) = row?;
            entities.regional_blocs.push(Arc::new(RegionalBloc {
                other_acronyms: other_acronyms.remove(&acronym).unwrap_or_default(),
                other_names: other_names.remove(&acronym).unwrap_or_default(),
                acronym,
                name,
            }));
        }

        Ok(entities)
    }

    fn load_country_rows(&self) -> Result<Vec<Country>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT alpha3_code, alpha2_code, name, capital, region, subregion, population,
                    demonym, area, gini, native_name, numeric_code, flag, cioc
             FROM country ORDER BY ordinal",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                Country {
                    alpha3_code: row.get(0)?,
                    alpha2_code: row.get(1)?,
                    name: row.get(2)?,
                    capital: row.get(3)?,
                    region: row.get(4)?,
                    subregion: row.get(5)?,
                    demonym: row.get(7)?,
                    area: row.get(8)?,
                    gini: row.get(9)?,
                    native_name: row.get(10)?,
                    numeric_code: row.get(11)?,
                    flag: row.get(12)?,
                    cioc: row.get(13)?,
                    ..Default::default()
                },
                row.get::<_, i64>(6)?,
            ))
        })?;

        let mut countries = Vec::new();
        for row in rows {
            let (mut country, population) = row?;
            country.population = u64::try_from(population).map_err(|_| {
                StoreError::InvalidData(format!(
                    "Negative population for {}: {}",
                    country.alpha3_code, population
                ))
            })?;
            countries.push(country);
        }
        Ok(countries)
    }

    /// Load `(key, value)` pairs of a child table, grouped by key in ordinal order.
    ///
    /// Table and column names are compile-time constants of this module.
    fn load_grouped(
        &self,
        table: &str,
        key_column: &str,
        value_column: &str,
    ) -> Result<HashMap<String, Vec<String>>, StoreError> {
        let sql = format!(
            "SELECT {key}, {value} FROM {table} ORDER BY {key}, ordinal",
            key = key_column,
            value = value_column,
            table = table,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            grouped.entry(key).or_default().push(value);
        }
        Ok(grouped)
    }

    fn load_lat_lngs(&self) -> Result<HashMap<String, (f64, f64)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT country_alpha3_code, lat, lng FROM lat_lng")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, (row.get::<_, f64>(1)?, row.get::<_, f64>(2)?)))
        })?;

        let mut lat_lngs = HashMap::new();
        for row in rows {
            let (code, lat_lng) = row?;
            lat_lngs.insert(code, lat_lng);
        }
        Ok(lat_lngs)
    }

    fn load_translations(&self) -> Result<HashMap<String, Translations>, StoreError> {
        let sql = format!(
            "SELECT country_alpha3_code, {} FROM translation",
            TRANSLATION_CODES.join(", ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let code: String = row.get(0)?;
            let mut translations = Translations::default();
            for (i, lang) in TRANSLATION_CODES.iter().enumerate() {
                translations.set(lang, row.get::<_, Option<String>>(i + 1)?);
            }
            Ok((code, translations))
        })?;

        let mut translations = HashMap::new();
        for row in rows {
            let (code, t) = row?;
            translations.insert(code, t);
        }
        Ok(translations)
    }
}

/// Reject snapshots that cannot be stored, before the cache is touched
fn validate_snapshot(countries: &[Country]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(countries.len());
    for country in countries {
        let code = country.alpha3_code.as_str();
        if code.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "Country '{}' has no alpha-3 code",
                country.name
            )));
        }
        if !seen.insert(code) {
            return Err(StoreError::InvalidData(format!("Duplicate country code {}", code)));
        }
        if !matches!(country.latlng.len(), 0 | 2) {
            return Err(StoreError::InvalidData(format!(
                "Country {} has {} coordinates, expected 0 or 2",
                code,
                country.latlng.len()
            )));
        }
        if i64::try_from(country.population).is_err() {
            return Err(StoreError::InvalidData(format!(
                "Population of {} out of range",
                code
            )));
        }
    }
    Ok(())
}

fn delete_all(conn: &Connection) -> Result<(), StoreError> {
    for table in TABLES_CHILD_FIRST {
        conn.execute(&format!("DELETE FROM {}", table), [])?;
    }
    Ok(())
}

fn insert_regional_blocs(conn: &Connection, entities: &NormalizedEntities) -> Result<(), StoreError> {
    let mut bloc_stmt =
        conn.prepare("INSERT INTO regional_bloc (acronym, ordinal, name) VALUES (?, ?, ?)")?;
    let mut acronym_stmt = conn.prepare(
        "INSERT INTO regional_bloc_other_acronym (regional_bloc_acronym, ordinal, other_acronym)
         VALUES (?, ?, ?)",
    )?;
    let mut name_stmt = conn.prepare(
        "INSERT INTO regional_bloc_other_name (regional_bloc_acronym, ordinal, other_name)
         VALUES (?, ?, ?)",
    )?;

    for (ordinal, bloc) in entities.regional_blocs.iter().enumerate() {
        bloc_stmt.execute(params![bloc.acronym, ordinal as i64, bloc.name])?;
        for (i, other) in bloc.other_acronyms.iter().enumerate() {
            acronym_stmt.execute(params![bloc.acronym, i as i64, other])?;
        }
        for (i, other) in bloc.other_names.iter().enumerate() {
            name_stmt.execute(params![bloc.acronym, i as i64, other])?;
        }
    }
    Ok(())
}

fn insert_languages(conn: &Connection, entities: &NormalizedEntities) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO language (iso639_2, ordinal, iso639_1, name, native_name) VALUES (?, ?, ?, ?, ?)",
    )?;
    for (ordinal, language) in entities.languages.iter().enumerate() {
        stmt.execute(params![
            language.iso639_2,
            ordinal as i64,
            language.iso639_1.as_deref(),
            language.name,
            language.native_name.as_deref(),
        ])?;
    }
    Ok(())
}

fn insert_currencies(conn: &Connection, entities: &NormalizedEntities) -> Result<(), StoreError> {
    let mut stmt =
        conn.prepare("INSERT INTO currency (code, ordinal, name, symbol) VALUES (?, ?, ?, ?)")?;
    for (ordinal, currency) in entities.currencies.iter().enumerate() {
        stmt.execute(params![
            currency.code,
            ordinal as i64,
            currency.name.as_deref(),
            currency.symbol.as_deref(),
        ])?;
    }
    Ok(())
}

fn insert_country(conn: &Connection, ordinal: usize, country: &Country) -> Result<(), StoreError> {
    let code = country.alpha3_code.as_str();
    let population = i64::try_from(country.population).map_err(|_| {
        StoreError::InvalidData(format!("Population of {} out of range", code))
    })?;

    conn.execute(
        "INSERT INTO country (alpha3_code, ordinal, alpha2_code, name, capital, region, subregion,
                              population, demonym, area, gini, native_name, numeric_code, flag, cioc)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            code,
            ordinal as i64,
            country.alpha2_code,
            country.name,
            country.capital,
            country.region,
            country.subregion,
            population,
            country.demonym,
            country.area,
            country.gini,
            country.native_name,
            country.numeric_code,
            country.flag,
            country.cioc,
        ],
    )?;

    let list_values: [&[String]; 5] = [
        &country.top_level_domain,
        &country.calling_codes,
        &country.alt_spellings,
        &country.borders,
        &country.timezones,
    ];
    for ((table, column), values) in COUNTRY_LIST_TABLES.iter().zip(list_values) {
        insert_list(conn, table, column, code, values.iter().map(String::as_str))?;
    }

    if let [lat, lng] = country.latlng.as_slice() {
        conn.execute(
            "INSERT INTO lat_lng (country_alpha3_code, lat, lng) VALUES (?, ?, ?)",
            params![code, *lat, *lng],
        )?;
    }

    if !country.translations.is_empty() {
        let t = &country.translations;
        conn.execute(
            "INSERT INTO translation (country_alpha3_code, de, es, fr, ja, it, br, pt, nl, hr, fa)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                code,
                t.de.as_deref(),
                t.es.as_deref(),
                t.fr.as_deref(),
                t.ja.as_deref(),
                t.it.as_deref(),
                t.br.as_deref(),
                t.pt.as_deref(),
                t.nl.as_deref(),
                t.hr.as_deref(),
                t.fa.as_deref(),
            ],
        )?;
    }

    insert_list(
        conn,
        "country_language",
        "language_iso639_2",
        code,
        country.languages.iter().map(|l| l.identity()),
    )?;
    insert_list(
        conn,
        "country_currency",
        "currency_code",
        code,
        country.currencies.iter().map(|c| c.identity()),
    )?;
    insert_list(
        conn,
        "country_regional_bloc",
        "regional_bloc_acronym",
        code,
        country.regional_blocs.iter().map(|b| b.identity()),
    )?;

    Ok(())
}

/// Insert ordered child rows for one country.
///
/// Table and column names are compile-time constants of this module.
fn insert_list<'a>(
    conn: &Connection,
    table: &str,
    column: &str,
    country_code: &str,
    values: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let sql = format!(
        "INSERT INTO {} (country_alpha3_code, ordinal, {}) VALUES (?, ?, ?)",
        table, column
    );
    let mut stmt = conn.prepare(&sql)?;
    for (ordinal, value) in values.enumerate() {
        stmt.execute(params![country_code, ordinal as i64, value])?;
    }
    Ok(())
}

fn write_sync_info(conn: &Connection, run_id: Uuid, country_count: usize) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("INSERT INTO sync_info (key, value) VALUES (?, ?)")?;
    stmt.execute(params!["run_id", run_id.to_string()])?;
    stmt.execute(params!["saved_at", Utc::now().to_rfc3339()])?;
    stmt.execute(params!["country_count", country_count.to_string()])?;
    Ok(())
}

fn index_by_identity<T: Identity>(set: &[Arc<T>]) -> HashMap<String, Arc<T>> {
    set.iter()
        .map(|entry| (entry.identity().to_string(), Arc::clone(entry)))
        .collect()
}

fn resolve<T>(
    country_code: &str,
    refs: Option<&Vec<String>>,
    index: &HashMap<String, Arc<T>>,
    kind: &str,
) -> Result<Vec<Arc<T>>, StoreError> {
    refs.map(|ids| ids.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|id| {
            index.get(id).cloned().ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "Country {} refers to unknown {} '{}'",
                    country_code, kind, id
                ))
            })
        })
        .collect()
}
