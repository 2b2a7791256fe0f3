use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points, Polygon};

use crate::charts::{Histogram, PrimaryChart, RankedBarChart, SeasonalChart, MONTH_LABELS};
use crate::data::filter::BrushState;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;
const PRIMARY_HEIGHT: f32 = 280.0;

const PRIMARY_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // steelblue
const BRUSH_FILL: Color32 = Color32::from_rgba_premultiplied(11, 20, 28, 40);

// ---------------------------------------------------------------------------
// Primary chart – owns the brush
// ---------------------------------------------------------------------------

/// Render the primary cohort chart and handle the brush drag gesture.
/// Dragging horizontally selects a year range; a zero-width drag clears it.
pub fn primary_chart(ui: &mut Ui, state: &mut AppState, chart: &PrimaryChart) {
    ui.strong(&chart.title);

    let brush = state.brush;
    let drag_anchor = state.drag_anchor;

    let response = Plot::new("primary_chart")
        .height(PRIMARY_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Host Start Year")
        .y_axis_label(chart.y_label)
        .x_axis_formatter(year_formatter)
        .show(ui, |plot_ui| {
            // Shade the committed brush, or the drag in progress.
            let span = match (drag_anchor, plot_ui.pointer_coordinate()) {
                (Some(anchor), Some(pointer)) => Some((anchor, pointer.x)),
                _ => match brush {
                    BrushState::Set { min_year, max_year } => {
                        Some((min_year as f64 - 0.5, max_year as f64 + 0.5))
                    }
                    BrushState::Unset => None,
                },
            };
            if let Some((a, b)) = span {
                let bounds = plot_ui.plot_bounds();
                let (lo, hi) = (a.min(b), a.max(b));
                let corners = vec![
                    [lo, bounds.min()[1]],
                    [hi, bounds.min()[1]],
                    [hi, bounds.max()[1]],
                    [lo, bounds.max()[1]],
                ];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(corners))
                        .fill_color(BRUSH_FILL)
                        .stroke(Stroke::NONE),
                );
            }

            let series: PlotPoints = chart
                .points
                .iter()
                .map(|p| [p.year as f64, p.value])
                .collect();
            plot_ui.line(Line::new(series).color(PRIMARY_COLOR).width(2.0));

            let markers: PlotPoints = chart
                .points
                .iter()
                .map(|p| [p.year as f64, p.value])
                .collect();
            plot_ui.points(Points::new(markers).color(PRIMARY_COLOR).radius(3.5));

            plot_ui.pointer_coordinate()
        });

    // Brush gesture: anchor on drag start, commit on release.
    let pointer = response.inner;
    if response.response.drag_started() {
        state.drag_anchor = pointer.map(|p| p.x);
    }
    if response.response.drag_stopped() {
        if let (Some(anchor), Some(p)) = (state.drag_anchor, pointer) {
            if (p.x - anchor).abs() < 0.25 {
                state.clear_brush();
            } else {
                state.commit_brush(anchor, p.x);
            }
        } else {
            state.drag_anchor = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Secondary charts – read-only views of the brushed rows
// ---------------------------------------------------------------------------

/// Price histogram of the brushed cohort.
pub fn histogram(ui: &mut Ui, chart: &Histogram) {
    ui.strong(&chart.title);

    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("${:.0}–${:.0}", b.start, b.end))
        })
        .collect();

    Plot::new(("histogram", &chart.title))
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label(chart.x_label)
        .y_axis_label("Number of Listings")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(46, 139, 87)));
        });
}

/// Ranked horizontal category bars (neighbourhoods, room types, superhost).
pub fn ranked_bars(ui: &mut Ui, chart: &RankedBarChart, color: Color32) {
    ui.strong(&chart.title);

    // Rank 0 at the top.
    let n = chart.bars.len();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(rank, bar)| {
            Bar::new((n - 1 - rank) as f64, bar.count as f64)
                .width(0.7)
                .horizontal()
                .name(&bar.label)
        })
        .collect();

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let formatter = move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 0.01 || idx < 0.0 {
            return String::new();
        }
        let rank = n.checked_sub(1 + idx as usize);
        rank.and_then(|r| labels.get(r))
            .cloned()
            .unwrap_or_default()
    };

    Plot::new(("ranked", &chart.title))
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Number of Listings")
        .y_axis_label(chart.category_label)
        .y_axis_formatter(formatter)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// Seasonal new-host counts per month, tier-scoped.
pub fn seasonal(ui: &mut Ui, chart: &SeasonalChart, color: Color32) {
    ui.strong(&chart.title);

    let bars: Vec<Bar> = chart
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new((11 - i) as f64, count as f64)
                .width(0.7)
                .horizontal()
                .name(MONTH_LABELS[i])
        })
        .collect();

    let formatter = |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 0.01 || !(0.0..=11.0).contains(&idx) {
            return String::new();
        }
        MONTH_LABELS[11 - idx as usize].to_string()
    };

    Plot::new("seasonal_chart")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Total Number of New Hosts")
        .y_axis_label("Month")
        .y_axis_formatter(formatter)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

fn year_formatter(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    let year = mark.value.round();
    if (mark.value - year).abs() > 0.01 {
        String::new()
    } else {
        format!("{year:.0}")
    }
}
