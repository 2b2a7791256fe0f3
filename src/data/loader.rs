use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::model::{Listing, ListingTable, PriceTier, TierRanges};
use super::tiers::{trim_interval, TierBounds};

/// Airbnb's founding year; no host can have joined earlier.
pub const FOUNDING_YEAR: i32 = 2008;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Loader failures. All of these are recovered at the UI boundary into a
/// status message; individual malformed cells never surface here (they
/// become missing values and fall to the row admission rule).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open '{path}': {source}")]
    MissingSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no listings survived cleaning; check the source file")]
    EmptyAfterFilter,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Cleaning configuration
// ---------------------------------------------------------------------------

/// How `host_since` is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// A single fixed format string, e.g. `%m/%d/%Y`.
    Explicit(&'static str),
    /// Try a small list of common formats in order.
    Inferred,
}

const INFERRED_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Which columns a row must have to be admitted. The source dashboards
/// disagreed on this, so it is configuration rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredColumns {
    /// price, host_since, host_id, property_type.
    Minimal,
    /// The full numeric + categorical set every chart depends on.
    Full,
}

#[derive(Debug, Clone, Copy)]
pub struct CleanConfig {
    pub date_format: DateFormat,
    pub required: RequiredColumns,
}

impl Default for CleanConfig {
    fn default() -> Self {
        CleanConfig {
            date_format: DateFormat::Explicit("%m/%d/%Y"),
            required: RequiredColumns::Full,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw CSV record – everything optional, all coercion is ours
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    host_id: Option<String>,
    host_since: Option<String>,
    price: Option<String>,
    reviews_per_month: Option<String>,
    review_scores_rating: Option<String>,
    calculated_host_listings_count: Option<String>,
    neighbourhood_cleansed: Option<String>,
    host_is_superhost: Option<String>,
    room_type: Option<String>,
    property_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// The cleaned table plus the tier display metadata derived alongside it.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub table: ListingTable,
    pub tier_ranges: TierRanges,
}

/// Load and clean a listings CSV from disk.
pub fn load_file(path: &Path, config: &CleanConfig) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::MissingSource {
        path: path.display().to_string(),
        source,
    })?;
    load_reader(file, config)
}

/// Load and clean a listings CSV from any reader. Same file ⇒ same table;
/// there is no hidden state between calls.
pub fn load_reader<R: Read>(reader: R, config: &CleanConfig) -> Result<LoadedData, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Header problems are fatal; individual bad records are not.
    csv_reader.headers()?;

    let current_year = Utc::now().year();
    let mut listings = Vec::new();

    for result in csv_reader.deserialize::<RawRecord>() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping unreadable CSV record: {e}");
                continue;
            }
        };
        if let Some(listing) = clean_record(&record, config, current_year) {
            listings.push(listing);
        }
    }

    if listings.is_empty() {
        return Err(LoadError::EmptyAfterFilter);
    }

    // Outlier trim on the admitted price distribution, then tier the rest.
    let mut prices: Vec<f64> = listings.iter().map(|l| l.price).collect();
    prices.sort_by(f64::total_cmp);
    let (trim_lo, trim_hi) = trim_interval(&prices);
    listings.retain(|l| l.price >= trim_lo && l.price <= trim_hi);

    if listings.is_empty() {
        return Err(LoadError::EmptyAfterFilter);
    }

    let mut trimmed: Vec<f64> = listings.iter().map(|l| l.price).collect();
    trimmed.sort_by(f64::total_cmp);
    let bounds = TierBounds::from_sorted(&trimmed);
    for listing in &mut listings {
        listing.tier = bounds.classify(listing.price);
    }

    Ok(LoadedData {
        table: ListingTable::from_listings(listings),
        tier_ranges: bounds.ranges(),
    })
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

/// Coerce one raw record into a [`Listing`], or `None` if it fails the
/// admission rules for the configured required-column set.
fn clean_record(record: &RawRecord, config: &CleanConfig, current_year: i32) -> Option<Listing> {
    let price = parse_price(record.price.as_deref())?;
    if price <= 0.0 {
        return None;
    }

    let host_since = parse_date(record.host_since.as_deref()?, config.date_format)?;
    let host_start_year = host_since.year();
    let host_start_month = host_since.month();
    if !(FOUNDING_YEAR..=current_year).contains(&host_start_year) {
        return None;
    }

    let host_id = parse_host_id(record.host_id.as_deref())?;

    // Reviews may legitimately be absent under the minimal set; a present
    // but negative or non-finite value is always invalid.
    let reviews_per_month = parse_number(record.reviews_per_month.as_deref())
        .filter(|v| v.is_finite() && *v >= 0.0);
    let review_scores_rating =
        parse_number(record.review_scores_rating.as_deref()).filter(|v| v.is_finite());
    let calculated_host_listings_count =
        parse_number(record.calculated_host_listings_count.as_deref()).filter(|v| v.is_finite());

    let neighbourhood = non_empty(record.neighbourhood_cleansed.as_deref());
    let room_type = non_empty(record.room_type.as_deref());
    let property_type = non_empty(record.property_type.as_deref());
    let superhost = record
        .host_is_superhost
        .as_deref()
        .and_then(parse_superhost);

    match config.required {
        RequiredColumns::Minimal => {
            // property_type is the one categorical key this set insists on.
            property_type.as_ref()?;
            Some(Listing {
                host_id,
                price,
                reviews_per_month: reviews_per_month.unwrap_or(f64::NAN),
                review_scores_rating: review_scores_rating.unwrap_or(f64::NAN),
                calculated_host_listings_count: calculated_host_listings_count
                    .unwrap_or(f64::NAN),
                neighbourhood: neighbourhood.unwrap_or_else(|| "Unknown".to_string()),
                room_type: room_type.unwrap_or_else(|| "Unknown".to_string()),
                property_type,
                // A boolean has no missing representation; rows without it
                // are dropped just as the full set does.
                superhost: superhost?,
                host_start_year,
                host_start_month,
                tier: PriceTier::Budget,
            })
        }
        RequiredColumns::Full => Some(Listing {
            host_id,
            price,
            reviews_per_month: reviews_per_month?,
            review_scores_rating: review_scores_rating?,
            calculated_host_listings_count: calculated_host_listings_count?,
            neighbourhood: neighbourhood?,
            room_type: room_type?,
            property_type,
            superhost: superhost?,
            host_start_year,
            host_start_month,
            tier: PriceTier::Budget,
        }),
    }
}

// ---------------------------------------------------------------------------
// Cell coercion helpers – failures become missing, never errors
// ---------------------------------------------------------------------------

/// Permissive numeric parse: `None` for absent, empty, or non-numeric cells.
pub(crate) fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

/// Price parse: strip `$` and thousands separators first, so `"$1,200"`
/// coerces to `1200.0`.
pub(crate) fn parse_price(cell: Option<&str>) -> Option<f64> {
    let stripped: String = cell?
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    parse_number(Some(&stripped))
}

pub(crate) fn parse_date(cell: &str, format: DateFormat) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    match format {
        DateFormat::Explicit(fmt) => NaiveDate::parse_from_str(cell, fmt).ok(),
        DateFormat::Inferred => INFERRED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok()),
    }
}

/// Accepts `t`/`f`/`true`/`false`, case-insensitive.
pub(crate) fn parse_superhost(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "t" | "true" => Some(true),
        "f" | "false" => Some(false),
        _ => None,
    }
}

/// Host ids occasionally arrive float-formatted (`"123.0"`).
fn parse_host_id(cell: Option<&str>) -> Option<i64> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PriceTier;

    const HEADER: &str = "host_id,host_since,price,reviews_per_month,review_scores_rating,calculated_host_listings_count,neighbourhood_cleansed,host_is_superhost,room_type,property_type";

    fn row(host_id: i64, date: &str, price: &str) -> String {
        format!("{host_id},{date},{price},1.2,4.8,2,Downtown,t,Entire home/apt,House")
    }

    fn load(csv: &str) -> Result<LoadedData, LoadError> {
        load_reader(csv.as_bytes(), &CleanConfig::default())
    }

    #[test]
    fn currency_symbols_and_separators_are_stripped() {
        assert_eq!(parse_price(Some("$1,200")), Some(1200.0));
        assert_eq!(parse_price(Some("950")), Some(950.0));
        assert_eq!(parse_price(Some("N/A")), None);
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn superhost_flags_parse_case_insensitively() {
        assert_eq!(parse_superhost("t"), Some(true));
        assert_eq!(parse_superhost("F"), Some(false));
        assert_eq!(parse_superhost("TRUE"), Some(true));
        assert_eq!(parse_superhost("false"), Some(false));
        assert_eq!(parse_superhost("yes"), None);
    }

    #[test]
    fn dates_follow_the_configured_format() {
        let explicit = DateFormat::Explicit("%m/%d/%Y");
        assert_eq!(
            parse_date("03/15/2016", explicit),
            NaiveDate::from_ymd_opt(2016, 3, 15)
        );
        assert_eq!(parse_date("2016-03-15", explicit), None);
        assert_eq!(
            parse_date("2016-03-15", DateFormat::Inferred),
            NaiveDate::from_ymd_opt(2016, 3, 15)
        );
        assert_eq!(parse_date("not a date", DateFormat::Inferred), None);
    }

    #[test]
    fn rows_with_unparseable_price_are_dropped() {
        // Flat price distribution so the outlier trim keeps every admitted
        // row and only the N/A price decides survival.
        let csv = format!(
            "{HEADER}\n{}\n{}\n{}\n",
            row(1, "01/10/2016", "$100"),
            row(2, "01/10/2016", "100"),
            row(3, "01/10/2016", "N/A"),
        );
        let data = load(&csv).unwrap();
        assert_eq!(data.table.len(), 2);
        assert!(data.table.listings.iter().all(|l| l.price == 100.0));
    }

    #[test]
    fn year_range_rule_rejects_pre_founding_and_future_years() {
        let csv = format!(
            "{HEADER}\n{}\n{}\n{}\n{}\n",
            row(1, "06/01/2007", "100"),
            row(2, "06/01/2016", "100"),
            row(3, "06/01/2016", "100"),
            row(4, "06/01/2099", "100"),
        );
        let data = load(&csv).unwrap();
        assert_eq!(data.table.len(), 2);
        assert!(data
            .table
            .listings
            .iter()
            .all(|l| l.host_start_year == 2016));
    }

    #[test]
    fn retained_rows_satisfy_the_cleaning_invariants() {
        let csv = format!(
            "{HEADER}\n{}\n{}\n{}\n",
            row(1, "02/01/2015", "100"),
            "2,02/29/2016,-5,1.2,4.8,2,Downtown,t,Private room,House",
            "3,02/01/2017,100,-1.0,4.8,2,Downtown,t,Private room,House",
        );
        let data = load(&csv).unwrap();
        for l in &data.table.listings {
            assert!(l.price > 0.0);
            assert!((FOUNDING_YEAR..=Utc::now().year()).contains(&l.host_start_year));
            assert!(l.reviews_per_month.is_finite() && l.reviews_per_month >= 0.0);
            assert!((1..=12).contains(&l.host_start_month));
        }
        // Negative price and negative reviews rows were both dropped.
        assert_eq!(data.table.len(), 1);
    }

    #[test]
    fn empty_after_filter_is_reported_not_fatal() {
        let csv = format!("{HEADER}\n1,bogus,N/A,x,x,x,,,x,\n");
        match load(&csv) {
            Err(LoadError::EmptyAfterFilter) => {}
            other => panic!("expected EmptyAfterFilter, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported_as_missing_source() {
        let err = load_file(Path::new("/no/such/listing.csv"), &CleanConfig::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingSource { .. }));
    }

    #[test]
    fn loading_twice_yields_identical_tables() {
        let csv = format!(
            "{HEADER}\n{}\n{}\n{}\n",
            row(1, "02/01/2015", "80"),
            row(2, "03/01/2016", "100"),
            row(3, "04/01/2017", "120"),
        );
        let a = load(&csv).unwrap();
        let b = load(&csv).unwrap();
        assert_eq!(a.table.len(), b.table.len());
        assert_eq!(a.tier_ranges, b.tier_ranges);
        for (x, y) in a.table.listings.iter().zip(&b.table.listings) {
            assert_eq!(x.host_id, y.host_id);
            assert_eq!(x.price, y.price);
            assert_eq!(x.tier, y.tier);
        }
    }

    #[test]
    fn every_retained_row_gets_exactly_one_tier() {
        let rows: String = (0..50)
            .map(|i| row(i, "05/01/2018", &format!("{}", 50 + i * 10)) + "\n")
            .collect();
        let csv = format!("{HEADER}\n{rows}");
        let data = load(&csv).unwrap();
        assert_eq!(data.tier_ranges.len(), 3);

        let budget = data
            .table
            .listings
            .iter()
            .filter(|l| l.tier == PriceTier::Budget)
            .count();
        let mid = data
            .table
            .listings
            .iter()
            .filter(|l| l.tier == PriceTier::MidRange)
            .count();
        let premium = data
            .table
            .listings
            .iter()
            .filter(|l| l.tier == PriceTier::Premium)
            .count();
        assert_eq!(budget + mid + premium, data.table.len());
        assert!(budget > 0 && mid > 0 && premium > 0);
    }

    #[test]
    fn minimal_required_set_admits_rows_missing_numeric_columns() {
        let csv = format!(
            "{HEADER}\n1,06/01/2019,100,,,,,t,,House\n2,06/01/2019,100,,,,,t,,\n"
        );
        let config = CleanConfig {
            date_format: DateFormat::Explicit("%m/%d/%Y"),
            required: RequiredColumns::Minimal,
        };
        let data = load_reader(csv.as_bytes(), &config).unwrap();
        // Row 2 lacks property_type, which the minimal set still requires.
        assert_eq!(data.table.len(), 1);
        let l = &data.table.listings[0];
        assert!(l.reviews_per_month.is_nan());
        assert_eq!(l.neighbourhood, "Unknown");

        // The full set rejects both rows.
        assert!(matches!(
            load(&csv),
            Err(LoadError::EmptyAfterFilter)
        ));
    }
}
