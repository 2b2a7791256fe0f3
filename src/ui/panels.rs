use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{BrushState, TierFilter};
use crate::data::model::{Metric, PriceTier};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} in brush",
                table.len(),
                state.brushed_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the control panel: metric dropdown, tier dropdown with the tier
/// price ranges, and the brush readout.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Metric selector ----
    ui.strong("Main chart metric");
    egui::ComboBox::from_id_salt("metric_select")
        .selected_text(state.metric.label())
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                if ui
                    .selectable_label(state.metric == metric, metric.label())
                    .clicked()
                {
                    state.metric = metric;
                }
            }
        });
    ui.separator();

    // ---- Price tier filter (applies to the seasonal chart) ----
    ui.strong("Price tier");
    egui::ComboBox::from_id_salt("tier_select")
        .selected_text(state.tier_filter.label())
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(state.tier_filter == TierFilter::All, "All")
                .clicked()
            {
                state.tier_filter = TierFilter::All;
            }
            for tier in PriceTier::ALL {
                if ui
                    .selectable_label(state.tier_filter == TierFilter::Only(tier), tier.label())
                    .clicked()
                {
                    state.tier_filter = TierFilter::Only(tier);
                }
            }
        });

    if !state.tier_ranges.is_empty() {
        ui.add_space(4.0);
        ui.label("Price tier ranges");
        for (tier, range) in &state.tier_ranges {
            let color = state.tier_colors.color_for(tier.label());
            ui.label(
                RichText::new(format!("{}: {range}", tier.label()))
                    .color(color)
                    .small(),
            );
        }
    }
    ui.separator();

    // ---- Brush readout ----
    ui.strong("Cohort brush");
    match state.brush {
        BrushState::Unset => {
            ui.label("All years selected. Drag across the main chart to brush a cohort range.");
        }
        BrushState::Set { min_year, max_year } => {
            ui.label(format!("Selected years: {min_year}–{max_year}"));
            if ui.button("Clear selection").clicked() {
                state.clear_brush();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
