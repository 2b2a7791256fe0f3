use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NashboardApp {
    pub state: AppState,
}

impl Default for NashboardApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for NashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: linked charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(charts) = self.state.charts() else {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("Open a listings CSV to explore the data  (File → Open…)");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut egui::Ui| {
                    plot::primary_chart(ui, &mut self.state, &charts.primary);
                    ui.add_space(8.0);

                    ui.columns(2, |columns: &mut [egui::Ui]| {
                        plot::histogram(&mut columns[0], &charts.price_histogram);
                        plot::ranked_bars(
                            &mut columns[1],
                            &charts.neighbourhoods,
                            egui::Color32::from_rgb(205, 133, 63),
                        );
                    });
                    ui.add_space(8.0);

                    ui.columns(2, |columns: &mut [egui::Ui]| {
                        plot::ranked_bars(
                            &mut columns[0],
                            &charts.superhost,
                            egui::Color32::from_rgb(106, 90, 205),
                        );
                        plot::ranked_bars(
                            &mut columns[1],
                            &charts.room_types,
                            egui::Color32::from_rgb(188, 143, 143),
                        );
                    });
                    ui.add_space(8.0);

                    let tier_color = self
                        .state
                        .tier_colors
                        .color_for(self.state.tier_filter.label());
                    plot::seasonal(ui, &charts.seasonal, tier_color);
                });
        });
    }
}
