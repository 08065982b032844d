//! Output formatting for CLI

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::Country;
use crate::progress::{ProgressReport, ProgressSink, ProgressStage};
use crate::store::SyncInfo;
use crate::sync::SyncOutcome;

/// Status line for the outcome of a run
pub fn status_line(outcome: &SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Fresh { .. } => "Data retrieved from source.",
        SyncOutcome::Cached { .. } => "No connection. Data retrieved from cache.",
        SyncOutcome::NoDataYet => {
            "No connection and no cached data yet. The first run needs a reachable source."
        }
    }
}

/// Status line printed while the cache refresh is still running
pub const UPDATING_CACHE: &str = "Updating cache...";

/// Status line printed once the cache refresh has been written
pub const CACHE_UPDATED: &str = "Cache updated.";

/// One line per country: code and name
pub fn format_country_line(country: &Country) -> String {
    format!("{}  {}", country.alpha3_code, country.name)
}

/// Format a country in detail
pub fn format_country_details(country: &Country) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} ({}, {})\n", country.name, country.alpha3_code, country.alpha2_code));
    if !country.native_name.is_empty() {
        output.push_str(&format!("  Native name: {}\n", country.native_name));
    }
    output.push_str(&format!("  Capital: {}\n", or_dash(&country.capital)));
    output.push_str(&format!(
        "  Region: {} / {}\n",
        or_dash(&country.region),
        or_dash(&country.subregion)
    ));
    output.push_str(&format!("  Population: {}\n", format_number(country.population)));
    if let Some(area) = country.area {
        output.push_str(&format!("  Area: {} km²\n", area));
    }
    if let Some(gini) = country.gini {
        output.push_str(&format!("  Gini: {}\n", gini));
    }
    if let Some((lat, lng)) = country.lat_lng() {
        output.push_str(&format!("  Location: {}, {}\n", lat, lng));
    }

    push_list(&mut output, "Calling codes", &country.calling_codes);
    push_list(&mut output, "Top-level domains", &country.top_level_domain);
    push_list(&mut output, "Timezones", &country.timezones);
    push_list(&mut output, "Borders", &country.borders);

    let languages: Vec<String> = country.languages.iter().map(|l| l.to_string()).collect();
    push_list(&mut output, "Languages", &languages);

    let currencies: Vec<String> = country
        .currencies
        .iter()
        .map(|c| match &c.symbol {
            Some(symbol) => format!("{} ({}, {})", c, c.code, symbol),
            None => format!("{} ({})", c, c.code),
        })
        .collect();
    push_list(&mut output, "Currencies", &currencies);

    let blocs: Vec<String> = country
        .regional_blocs
        .iter()
        .map(|b| format!("{} ({})", b.name, b.acronym))
        .collect();
    push_list(&mut output, "Regional blocs", &blocs);

    let translations: Vec<String> = country
        .translations
        .entries()
        .into_iter()
        .filter_map(|(code, value)| value.map(|v| format!("{}: {}", code, v)))
        .collect();
    push_list(&mut output, "Translations", &translations);

    output
}

/// Format cache metadata
pub fn format_sync_info(info: Option<&SyncInfo>, schema_version: i32) -> String {
    match info {
        Some(info) => format!(
            "Schema version: {}\nLast saved: {}\nRun id: {}\nCountries: {}\n",
            schema_version,
            info.saved_at.to_rfc3339(),
            info.run_id,
            info.country_count
        ),
        None => format!("Schema version: {}\nThe cache has not been written yet.\n", schema_version),
    }
}

fn push_list(output: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        output.push_str(&format!("  {}: {}\n", label, values.join(", ")));
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Progress bar fed by sync progress reports
#[derive(Clone)]
pub struct SyncProgress {
    bar: ProgressBar,
}

impl SyncProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A progress reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Print a line above the bar
    pub fn println(&self, line: &str) {
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for SyncProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SyncProgress {
    fn report(&self, report: ProgressReport) {
        let message = match report.stage {
            ProgressStage::Fetched => "fetched",
            ProgressStage::RegionalBlocs => "saving regional blocs",
            ProgressStage::Languages => "saving languages",
            ProgressStage::Currencies => "saving currencies",
            ProgressStage::CountrySaved => "saving countries",
            ProgressStage::CountryLoaded => "loading countries",
        };
        self.bar.set_message(message);
        self.bar.set_position(u64::from(report.percentage_complete));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, Language};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(10_374_822), "10,374,822");
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            status_line(&SyncOutcome::Cached { countries: Vec::new() }),
            "No connection. Data retrieved from cache."
        );
        assert!(status_line(&SyncOutcome::NoDataYet).starts_with("No connection and no cached data"));
    }

    #[test]
    fn test_format_country_details() {
        let mut country = Country::new("PRT", "Portugal")
            .with_language(Language::new("por", "Portuguese"))
            .with_currency(Currency::new("EUR", "Euro", "€"));
        country.alpha2_code = "PT".to_string();
        country.population = 10_374_822;
        country.translations.de = Some("Portugal".to_string());

        let output = format_country_details(&country);
        assert!(output.starts_with("Portugal (PRT, PT)\n"));
        assert!(output.contains("  Capital: -\n"));
        assert!(output.contains("  Population: 10,374,822\n"));
        assert!(output.contains("  Languages: Portuguese\n"));
        assert!(output.contains("  Currencies: Euro (EUR, €)\n"));
        assert!(output.contains("  Translations: de: Portugal\n"));
        assert!(!output.contains("Borders"));
    }

    #[test]
    fn test_hidden_progress_accepts_reports() {
        let progress = SyncProgress::hidden();
        progress.report(ProgressReport::new(ProgressStage::CountrySaved, 50));
        progress.finish();
    }
}
