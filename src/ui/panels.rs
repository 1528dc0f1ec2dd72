use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::write_summaries;
use crate::scene::{Scene, TemperatureKind};
use crate::state::AppState;

use super::waker;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.chart.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.data_path.display().to_string());

        if state.loading() {
            ui.separator();
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Scene header
// ---------------------------------------------------------------------------

/// "Scene N" caption, title, description and, on the temperature scene,
/// the temperature selector buttons.
pub fn scene_header(ui: &mut Ui, state: &mut AppState) {
    let scene = state.scene();
    ui.label(RichText::new(scene.to_string()).small().weak());
    ui.heading(scene.title());
    ui.label(scene.description());

    if scene == Scene::TemperatureDetails {
        ui.horizontal(|ui: &mut Ui| {
            for kind in TemperatureKind::ALL {
                if ui
                    .selectable_label(state.temperature == kind, kind.button_label())
                    .clicked()
                {
                    state.select_temperature(kind, waker(ui.ctx()));
                }
            }
        });
    }
    ui.separator();
}

// ---------------------------------------------------------------------------
// Bottom navigation
// ---------------------------------------------------------------------------

/// Back / Next buttons; each is only shown when the move is possible.
pub fn nav_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if state.navigator.can_retreat() && ui.button("← Back").clicked() {
            state.retreat(waker(ui.ctx()));
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if state.navigator.can_advance() && ui.button("Next →").clicked() {
                state.advance(waker(ui.ctx()));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open climate data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_data_path(path, waker(ctx));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(chart) = &state.chart else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export yearly summary")
        .set_file_name("yearly_summary.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        let fields = chart.scene.summary_fields();
        match write_summaries(&path, &fields, &chart.summaries) {
            Ok(()) => {
                log::info!("Exported {} summaries to {}", chart.summaries.len(), path.display());
                state.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export summary: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
