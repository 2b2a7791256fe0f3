use super::model::{Listing, ListingTable, PriceTier};

// ---------------------------------------------------------------------------
// Brush selection over the cohort-year axis
// ---------------------------------------------------------------------------

/// The shared interactive selection owned by the primary chart. `Unset`
/// selects every row; `Set` keeps rows whose `host_start_year` lies in the
/// inclusive range. One writer (the UI), many readers (the chart builders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushState {
    #[default]
    Unset,
    Set {
        min_year: i32,
        max_year: i32,
    },
}

impl BrushState {
    /// Build a `Set` state from two drag endpoints in either order.
    /// A degenerate single-year drag is still a valid selection.
    pub fn from_endpoints(a: i32, b: i32) -> Self {
        BrushState::Set {
            min_year: a.min(b),
            max_year: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        match self {
            BrushState::Unset => true,
            BrushState::Set { min_year, max_year } => (*min_year..=*max_year).contains(&year),
        }
    }

}

// ---------------------------------------------------------------------------
// Independent categorical tier filter (dropdown)
// ---------------------------------------------------------------------------

/// The price-tier dropdown. Composes with the brush by conjunction: a row
/// must satisfy both to be counted in a tier-scoped chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFilter {
    #[default]
    All,
    Only(PriceTier),
}

impl TierFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Only(tier) => listing.tier == *tier,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TierFilter::All => "All",
            TierFilter::Only(tier) => tier.label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// Rows currently included by the brush.
pub fn brushed<'a>(table: &'a ListingTable, brush: &BrushState) -> Vec<&'a Listing> {
    table
        .listings
        .iter()
        .filter(|l| brush.contains(l.host_start_year))
        .collect()
}

/// Rows included by both the brush and the tier dropdown.
pub fn brushed_and_tiered<'a>(
    table: &'a ListingTable,
    brush: &BrushState,
    tier: &TierFilter,
) -> Vec<&'a Listing> {
    table
        .listings
        .iter()
        .filter(|l| brush.contains(l.host_start_year) && tier.matches(l))
        .collect()
}
