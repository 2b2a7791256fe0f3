//! Chart-binding engine.
//!
//! `build_charts` is a pure function from the cleaned table plus the current
//! selection/widget state to a set of renderable chart descriptions. The UI
//! host calls it on every interaction; same inputs always produce the same
//! `ChartSet`. The primary chart owns the brush; every secondary chart
//! applies the brush predicate before computing its own aggregation.

use std::collections::BTreeMap;

use crate::data::filter::{brushed, brushed_and_tiered, BrushState, TierFilter};
use crate::data::model::{ListingTable, Metric};

/// Number of equal-width bins in the price histogram.
pub const PRICE_BINS: usize = 40;

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

/// One aggregated point of the primary chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// The primary chart: chosen metric aggregated per host start year.
/// Rendered over the full table; the brush highlights rather than filters it.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryChart {
    pub title: String,
    pub y_label: &'static str,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width price histogram over the brushed rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: &'static str,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub label: String,
    pub count: usize,
}

/// Horizontal bars ranked by descending count, ties broken by label.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBarChart {
    pub title: String,
    pub category_label: &'static str,
    pub bars: Vec<CategoryBar>,
}

impl RankedBarChart {
    pub fn total_count(&self) -> usize {
        self.bars.iter().map(|b| b.count).sum()
    }
}

/// New-host counts per calendar month (1–12, zeros included), scoped by the
/// brush AND the tier dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalChart {
    pub title: String,
    /// Index 0 = January.
    pub counts: [usize; 12],
}

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Everything the UI renders for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub primary: PrimaryChart,
    pub price_histogram: Histogram,
    pub neighbourhoods: RankedBarChart,
    pub superhost: RankedBarChart,
    pub room_types: RankedBarChart,
    pub seasonal: SeasonalChart,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Build every chart from the current table and widget state. Pure: no
/// side effects, deterministic output.
pub fn build_charts(
    table: &ListingTable,
    metric: Metric,
    brush: &BrushState,
    tier_filter: &TierFilter,
) -> ChartSet {
    let in_brush = brushed(table, brush);
    let in_brush_and_tier = brushed_and_tiered(table, brush, tier_filter);

    ChartSet {
        primary: primary_chart(table, metric),
        price_histogram: price_histogram(&in_brush),
        neighbourhoods: ranked_bars(
            "Top Neighborhoods for Selected Cohort",
            "Neighborhood",
            in_brush.iter().map(|l| l.neighbourhood.as_str()),
        ),
        superhost: ranked_bars(
            "Superhost Status for Selected Cohort",
            "Is Superhost?",
            in_brush
                .iter()
                .map(|l| if l.superhost { "Superhost" } else { "Regular host" }),
        ),
        room_types: ranked_bars(
            "Room Type Breakdown for Selected Cohort",
            "Room Type",
            in_brush.iter().map(|l| l.room_type.as_str()),
        ),
        seasonal: seasonal_chart(&in_brush_and_tier, tier_filter),
    }
}

/// Aggregate the chosen metric per host start year over the full table.
/// Count of host ids for the count metric, arithmetic mean otherwise
/// (non-finite values are left out of the mean).
fn primary_chart(table: &ListingTable, metric: Metric) -> PrimaryChart {
    let mut groups: BTreeMap<i32, (usize, f64)> = BTreeMap::new();
    for listing in &table.listings {
        match metric.value(listing) {
            None => {
                groups.entry(listing.host_start_year).or_insert((0, 0.0)).0 += 1;
            }
            Some(v) if v.is_finite() => {
                let entry = groups.entry(listing.host_start_year).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += v;
            }
            Some(_) => {}
        }
    }

    let points = groups
        .into_iter()
        .filter(|(_, (n, _))| *n > 0)
        .map(|(year, (n, sum))| SeriesPoint {
            year,
            value: match metric {
                Metric::NewHosts => n as f64,
                _ => sum / n as f64,
            },
        })
        .collect();

    PrimaryChart {
        title: format!("{} by Host Start Year", metric.label()),
        y_label: metric.label(),
        points,
    }
}

fn price_histogram(rows: &[&crate::data::model::Listing]) -> Histogram {
    let title = "Price Distribution for Selected Cohort".to_string();
    if rows.is_empty() {
        return Histogram {
            title,
            x_label: "Price per Night (USD)",
            bins: Vec::new(),
        };
    }

    let min = rows.iter().map(|l| l.price).fold(f64::INFINITY, f64::min);
    let max = rows
        .iter()
        .map(|l| l.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let width = ((max - min) / PRICE_BINS as f64).max(f64::EPSILON);

    let mut bins: Vec<HistogramBin> = (0..PRICE_BINS)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for listing in rows {
        // The maximum lands in the last bin rather than one past the end.
        let idx = (((listing.price - min) / width) as usize).min(PRICE_BINS - 1);
        bins[idx].count += 1;
    }

    Histogram {
        title,
        x_label: "Price per Night (USD)",
        bins,
    }
}

/// Count per category, sorted by descending count; ties broken by label
/// ascending so the ranking is stable and deterministic.
fn ranked_bars<'a>(
    title: &str,
    category_label: &'static str,
    labels: impl Iterator<Item = &'a str>,
) -> RankedBarChart {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut bars: Vec<CategoryBar> = counts
        .into_iter()
        .map(|(label, count)| CategoryBar {
            label: label.to_string(),
            count,
        })
        .collect();
    bars.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    RankedBarChart {
        title: title.to_string(),
        category_label,
        bars,
    }
}

fn seasonal_chart(
    rows: &[&crate::data::model::Listing],
    tier_filter: &TierFilter,
) -> SeasonalChart {
    let mut counts = [0usize; 12];
    for listing in rows {
        counts[listing.host_start_month as usize - 1] += 1;
    }
    SeasonalChart {
        title: format!(
            "Total New Hosts by Start Month for '{}' Listings",
            tier_filter.label()
        ),
        counts,
    }
}
