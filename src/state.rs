use std::path::{Path, PathBuf};

use crate::charts::{build_charts, ChartSet};
use crate::color::ColorMap;
use crate::data::filter::{BrushState, TierFilter};
use crate::data::loader::{load_file, CleanConfig, LoadError};
use crate::data::model::{ListingTable, Metric, PriceTier, TierRanges};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering. One writer (the UI),
/// many readers (the chart builders).
pub struct AppState {
    /// Cleaned table (None until a file loads successfully).
    pub dataset: Option<ListingTable>,

    /// Tier → formatted price range, derived at load time.
    pub tier_ranges: TierRanges,

    /// Path of the currently loaded file; memo key so reopening the same
    /// file does not re-read or re-parse it.
    pub source_path: Option<PathBuf>,

    /// Cleaning policy (date strictness, required-column set).
    pub config: CleanConfig,

    /// Metric shown on the primary chart.
    pub metric: Metric,

    /// Price-tier dropdown.
    pub tier_filter: TierFilter,

    /// Brush selection owned by the primary chart.
    pub brush: BrushState,

    /// First endpoint of an in-progress brush drag, in plot x coordinates.
    pub drag_anchor: Option<f64>,

    /// Tier label → colour for the side panel and seasonal chart.
    pub tier_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            tier_ranges: TierRanges::new(),
            source_path: None,
            config: CleanConfig::default(),
            metric: Metric::NewHosts,
            tier_filter: TierFilter::All,
            brush: BrushState::Unset,
            drag_anchor: None,
            tier_colors: ColorMap::new(PriceTier::ALL.iter().map(|t| t.label())),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a listings file, skipping the read entirely when `path` is the
    /// file already loaded.
    pub fn load_path(&mut self, path: &Path) {
        if self.dataset.is_some() && self.source_path.as_deref() == Some(path) {
            log::debug!("'{}' already loaded, skipping re-read", path.display());
            return;
        }

        match load_file(path, &self.config) {
            Ok(data) => {
                log::info!(
                    "Loaded {} listings from '{}' (years {}–{})",
                    data.table.len(),
                    path.display(),
                    data.table.year_min,
                    data.table.year_max,
                );
                self.dataset = Some(data.table);
                self.tier_ranges = data.tier_ranges;
                self.source_path = Some(path.to_path_buf());
                self.brush = BrushState::Unset;
                self.drag_anchor = None;
                self.tier_filter = TierFilter::All;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load '{}': {e}", path.display());
                self.status_message = Some(match e {
                    LoadError::EmptyAfterFilter => {
                        "No listings survived cleaning; charts cannot be drawn.".to_string()
                    }
                    other => format!("Error: {other}"),
                });
            }
        }
    }

    /// Rebuild the chart descriptions for the current interaction. Pure
    /// with respect to the table and widget state.
    pub fn charts(&self) -> Option<ChartSet> {
        self.dataset
            .as_ref()
            .map(|table| build_charts(table, self.metric, &self.brush, &self.tier_filter))
    }

    /// Rows currently included by the brush, for the top-bar summary.
    pub fn brushed_count(&self) -> usize {
        self.dataset
            .as_ref()
            .map(|t| {
                t.listings
                    .iter()
                    .filter(|l| self.brush.contains(l.host_start_year))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Explicit clear: Set → Unset.
    pub fn clear_brush(&mut self) {
        self.brush = BrushState::Unset;
        self.drag_anchor = None;
    }

    /// Commit a drag gesture as the new brush range, snapping the endpoints
    /// to whole cohort years.
    pub fn commit_brush(&mut self, from_x: f64, to_x: f64) {
        self.brush = BrushState::from_endpoints(from_x.round() as i32, to_x.round() as i32);
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::test_support::listing;

    fn state_with_rows() -> AppState {
        let mut state = AppState::default();
        state.dataset = Some(ListingTable::from_listings(vec![
            listing(1, 2015, 1, 100.0),
            listing(2, 2016, 6, 120.0),
            listing(3, 2016, 6, 140.0),
            listing(4, 2020, 12, 160.0),
        ]));
        state
    }

    #[test]
    fn charts_require_a_dataset() {
        let state = AppState::default();
        assert!(state.charts().is_none());
    }

    #[test]
    fn brush_lifecycle_set_adjust_clear() {
        let mut state = state_with_rows();
        assert_eq!(state.brushed_count(), 4);

        state.commit_brush(2016.2, 2015.7); // drag right-to-left, snaps
        assert_eq!(
            state.brush,
            BrushState::Set {
                min_year: 2016,
                max_year: 2016
            }
        );
        assert_eq!(state.brushed_count(), 2);

        state.commit_brush(2015.0, 2020.0); // drag-adjust
        assert_eq!(state.brushed_count(), 4);

        state.clear_brush();
        assert_eq!(state.brush, BrushState::Unset);
        assert_eq!(state.brushed_count(), 4);
    }

    #[test]
    fn failed_load_sets_a_status_message() {
        let mut state = AppState::default();
        state.load_path(Path::new("/no/such/file.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn reloading_the_same_path_skips_the_file_read() {
        let dir = std::env::temp_dir().join("nashboard_memo_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("listings.csv");

        let header = "host_id,host_since,price,reviews_per_month,review_scores_rating,calculated_host_listings_count,neighbourhood_cleansed,host_is_superhost,room_type,property_type";
        let two_rows = format!(
            "{header}\n1,01/10/2016,100,1.2,4.8,2,Downtown,t,Private room,House\n2,01/10/2017,100,1.2,4.8,2,Downtown,f,Private room,House\n"
        );
        std::fs::write(&path, &two_rows).unwrap();

        let mut state = AppState::default();
        state.load_path(&path);
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);

        // Rewrite the file; a memoized reload of the same path must not
        // pick the new contents up.
        let one_row =
            format!("{header}\n1,01/10/2016,100,1.2,4.8,2,Downtown,t,Private room,House\n");
        std::fs::write(&path, &one_row).unwrap();
        state.load_path(&path);
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
