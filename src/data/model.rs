use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// PriceTier – derived categorical price bucket
// ---------------------------------------------------------------------------

/// Price tier bucket computed from percentile cut-points of the
/// outlier-trimmed price distribution (see [`crate::data::tiers`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceTier {
    Budget,
    MidRange,
    Premium,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Budget, PriceTier::MidRange, PriceTier::Premium];

    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Budget => "Budget",
            PriceTier::MidRange => "Mid-Range",
            PriceTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Human-readable price range per tier, e.g. `"$45 - $95"`.
/// Presentation metadata derived from the trimmed distribution.
pub type TierRanges = BTreeMap<PriceTier, String>;

// ---------------------------------------------------------------------------
// Metric – what the primary chart aggregates per cohort year
// ---------------------------------------------------------------------------

/// The metric shown on the primary chart's y-axis, grouped by host start
/// year. `NewHosts` is a row count; the rest are arithmetic means of the
/// named numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    NewHosts,
    AvgReviewsPerMonth,
    AvgPrice,
    AvgRating,
    AvgHostListings,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::NewHosts,
        Metric::AvgReviewsPerMonth,
        Metric::AvgPrice,
        Metric::AvgRating,
        Metric::AvgHostListings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::NewHosts => "Number of New Hosts",
            Metric::AvgReviewsPerMonth => "Average Reviews per Month",
            Metric::AvgPrice => "Average Listing Price",
            Metric::AvgRating => "Average Overall Rating",
            Metric::AvgHostListings => "Average Host Listings Count",
        }
    }

    /// The numeric value this metric averages, `None` for the count metric.
    pub fn value(&self, listing: &Listing) -> Option<f64> {
        match self {
            Metric::NewHosts => None,
            Metric::AvgReviewsPerMonth => Some(listing.reviews_per_month),
            Metric::AvgPrice => Some(listing.price),
            Metric::AvgRating => Some(listing.review_scores_rating),
            Metric::AvgHostListings => Some(listing.calculated_host_listings_count),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Listing – one cleaned row of the source CSV
// ---------------------------------------------------------------------------

/// A single Airbnb listing after cleaning. Every field the charts depend on
/// is guaranteed present and in range (see [`crate::data::loader`]).
#[derive(Debug, Clone)]
pub struct Listing {
    pub host_id: i64,
    pub price: f64,
    pub reviews_per_month: f64,
    pub review_scores_rating: f64,
    pub calculated_host_listings_count: f64,
    pub neighbourhood: String,
    pub room_type: String,
    pub property_type: Option<String>,
    pub superhost: bool,
    /// Year component of `host_since`, within [2008, current year].
    pub host_start_year: i32,
    /// Month component of `host_since`, 1–12.
    pub host_start_month: u32,
    /// Assigned from the trimmed price distribution at load time.
    pub tier: PriceTier,
}

// ---------------------------------------------------------------------------
// ListingTable – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The full cleaned table, immutable after load, with its precomputed
/// cohort-year domain.
#[derive(Debug, Clone)]
pub struct ListingTable {
    pub listings: Vec<Listing>,
    pub year_min: i32,
    pub year_max: i32,
}

impl ListingTable {
    /// Build the table and its year domain from cleaned rows.
    /// The loader rejects empty results with `EmptyAfterFilter` before a
    /// table is ever constructed, so the domain is well defined.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let year_min = listings.iter().map(|l| l.host_start_year).min().unwrap_or(0);
        let year_max = listings.iter().map(|l| l.host_start_year).max().unwrap_or(0);
        ListingTable {
            listings,
            year_min,
            year_max,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A listing with sane defaults for unit tests.
    pub fn listing(host_id: i64, year: i32, month: u32, price: f64) -> Listing {
        Listing {
            host_id,
            price,
            reviews_per_month: 1.0,
            review_scores_rating: 4.5,
            calculated_host_listings_count: 1.0,
            neighbourhood: "Downtown".to_string(),
            room_type: "Entire home/apt".to_string(),
            property_type: Some("House".to_string()),
            superhost: false,
            host_start_year: year,
            host_start_month: month,
            tier: PriceTier::Budget,
        }
    }
}
