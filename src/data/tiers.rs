use super::model::{PriceTier, TierRanges};

// ---------------------------------------------------------------------------
// Percentile cut-points
// ---------------------------------------------------------------------------

/// Outlier trim: keep prices within the [5th, 95th] percentile.
pub const TRIM_LOW_Q: f64 = 0.05;
pub const TRIM_HIGH_Q: f64 = 0.95;

/// Tier split of the trimmed distribution at the 33rd/66th percentile.
pub const TIER_LOW_Q: f64 = 0.33;
pub const TIER_HIGH_Q: f64 = 0.66;

/// Linearly interpolated quantile over a sorted slice (the same estimator
/// Pandas uses by default). `q` must lie in [0, 1].
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    assert!(!sorted.is_empty(), "quantile of empty slice");
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

// ---------------------------------------------------------------------------
// TierBounds – the three contiguous intervals over the trimmed range
// ---------------------------------------------------------------------------

/// Cut points partitioning the trimmed price range:
/// Budget = [min, low], Mid-Range = (low, high], Premium = (high, max].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBounds {
    pub min: f64,
    pub low: f64,
    pub high: f64,
    pub max: f64,
}

impl TierBounds {
    /// Compute bounds from the trimmed, sorted price distribution.
    pub fn from_sorted(trimmed_sorted: &[f64]) -> Self {
        TierBounds {
            min: trimmed_sorted[0],
            low: quantile(trimmed_sorted, TIER_LOW_Q),
            high: quantile(trimmed_sorted, TIER_HIGH_Q),
            max: trimmed_sorted[trimmed_sorted.len() - 1],
        }
    }

    /// Classify one price. Prices at or below the low cut are Budget, at or
    /// below the high cut Mid-Range, everything else Premium.
    pub fn classify(&self, price: f64) -> PriceTier {
        if price <= self.low {
            PriceTier::Budget
        } else if price <= self.high {
            PriceTier::MidRange
        } else {
            PriceTier::Premium
        }
    }

    /// Display mapping: tier → formatted min–max string.
    pub fn ranges(&self) -> TierRanges {
        let mut ranges = TierRanges::new();
        ranges.insert(
            PriceTier::Budget,
            format!("{} - {}", format_usd(self.min), format_usd(self.low)),
        );
        ranges.insert(
            PriceTier::MidRange,
            format!("{} - {}", format_usd(self.low), format_usd(self.high)),
        );
        ranges.insert(
            PriceTier::Premium,
            format!("{} - {}", format_usd(self.high), format_usd(self.max)),
        );
        ranges
    }
}

/// The [5th, 95th] percentile interval used for outlier trimming.
pub fn trim_interval(sorted: &[f64]) -> (f64, f64) {
    (
        quantile(sorted, TRIM_LOW_Q),
        quantile(sorted, TRIM_HIGH_Q),
    )
}

/// Format a price as whole dollars with thousands separators, e.g. `$1,200`.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates_between_points() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&values, 0.0), 10.0);
        assert_eq!(quantile(&values, 0.5), 30.0);
        assert_eq!(quantile(&values, 1.0), 50.0);
        // 0.25 * 4 = index 1.0 exactly
        assert_eq!(quantile(&values, 0.25), 20.0);
        // 0.1 * 4 = 0.4 → 10 + 0.4 * 10
        assert!((quantile(&values, 0.1) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn bounds_partition_trimmed_range() {
        let sorted: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let bounds = TierBounds::from_sorted(&sorted);

        assert_eq!(bounds.min, 1.0);
        assert_eq!(bounds.max, 100.0);
        assert!(bounds.min <= bounds.low && bounds.low <= bounds.high && bounds.high <= bounds.max);

        // Every value gets exactly one tier and the intervals are contiguous.
        let mut last = PriceTier::Budget;
        for &p in &sorted {
            let tier = bounds.classify(p);
            assert!(tier >= last, "tiers must be monotone over sorted prices");
            last = tier;
        }
        assert_eq!(bounds.classify(bounds.min), PriceTier::Budget);
        assert_eq!(bounds.classify(bounds.low), PriceTier::Budget);
        assert_eq!(bounds.classify(bounds.high), PriceTier::MidRange);
        assert_eq!(bounds.classify(bounds.max), PriceTier::Premium);
    }

    #[test]
    fn ranges_cover_all_three_tiers() {
        let sorted: Vec<f64> = (1..=100).map(|i| i as f64 * 10.0).collect();
        let bounds = TierBounds::from_sorted(&sorted);
        let ranges = bounds.ranges();
        assert_eq!(ranges.len(), 3);
        assert!(ranges[&PriceTier::Budget].starts_with("$10"));
        assert!(ranges[&PriceTier::Premium].ends_with("$1,000"));
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(950.0), "$950");
        assert_eq!(format_usd(1200.0), "$1,200");
        assert_eq!(format_usd(1234567.4), "$1,234,567");
    }
}
