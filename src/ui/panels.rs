use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{DimValue, Dimension};
use crate::report::View;
use crate::report::case_study::CaseStudy;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – view picker and filter widgets
// ---------------------------------------------------------------------------

/// Render the left sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Views");
    ui.separator();

    let mut view = state.view;
    let exploring = view == View::Explorer;
    ui.horizontal(|ui: &mut Ui| {
        if ui.selectable_label(!exploring, "Case studies").clicked() && exploring {
            view = View::default();
        }
        if ui.selectable_label(exploring, "Explorer").clicked() {
            view = View::Explorer;
        }
    });
    ui.add_space(4.0);

    if let View::CaseStudy(current) = view {
        ui.strong("Select business case study");
        for cs in CaseStudy::ALL {
            let label = format!("{}. {}", cs.number(), cs.title());
            if ui.selectable_label(current == cs, label).clicked() {
                view = View::CaseStudy(cs);
            }
        }
    }
    state.set_view(view);

    if state.view == View::Explorer {
        ui.separator();
        filter_widgets(ui, state);
    }
}

/// Multi-select checkboxes for each filterable dimension.
fn filter_widgets(ui: &mut Ui, state: &mut AppState) {
    // Clone the Arc so we can mutate state inside the loop.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::FILTERABLE {
                let all_values: Vec<&DimValue> = dataset.unique_values(dim).collect();
                let n_total = all_values.len();
                let n_selected = if state.selection.is_constrained(dim) {
                    state.selection.values(dim).count()
                } else {
                    n_total
                };
                let header_text = format!("{}  ({n_selected}/{n_total})", dim.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim)
                    .default_open(dim != Dimension::State)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all(dim);
                        }

                        for val in all_values {
                            ui.horizontal(|ui: &mut Ui| {
                                let mut checked = state.selection.admits(dim, val);
                                if ui.checkbox(&mut checked, val.to_string()).changed() {
                                    state.toggle_filter_value(dim, val);
                                }
                                if ui.small_button("only").clicked() {
                                    state.select_only(dim, val);
                                }
                            });
                        }
                    });
            }
        });
}

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

        if let (Some(ds), Some(path)) = (&state.dataset, &state.data_path) {
            let shown = state.report.as_ref().map_or(ds.len(), |r| r.rows);
            ui.label(format!("{}: {shown} of {} records", path.display(), ds.len()));
        }

        ui.separator();

        ui.toggle_value(&mut state.show_tables, "Data tables");

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open payment statistics")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
