/// Data layer: core types, loading/cleaning, tiering, and filtering.
///
/// Architecture:
/// ```text
///  nashville.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce + admit rows → ListingTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  tiers    │  5–95 trim, 33/66 split → PriceTier per row
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  brush ∧ tier dropdown → included rows
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod tiers;
