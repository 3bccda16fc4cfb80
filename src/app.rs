use eframe::egui;

use crate::config::DashboardConfig;
use crate::report::ReportBuilder;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app and load the configured dataset. A failed load leaves
    /// the dashboard empty with the error in the top bar.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(ReportBuilder::global(config.report_settings()));
        state.open(&config.data_path);
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: views and filters ----
        egui::SidePanel::left("view_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::report_page(ui, &self.state);
        });
    }
}
