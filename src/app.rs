use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, waker};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ClimateSlidesApp {
    pub state: AppState,
}

impl ClimateSlidesApp {
    /// Build the app and kick off the first scene's draw.
    pub fn new(cc: &eframe::CreationContext<'_>, mut state: AppState) -> Self {
        state.enter_scene(waker(&cc.egui_ctx));
        Self { state }
    }
}

impl eframe::App for ClimateSlidesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_draws();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: scene navigation ----
        egui::TopBottomPanel::bottom("nav_bar").show(ctx, |ui| {
            panels::nav_bar(ui, &mut self.state);
        });

        // ---- Central panel: scene header + chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::scene_header(ui, &mut self.state);
            plot::scene_chart(ui, &mut self.state);
        });
    }
}
