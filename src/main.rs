mod app;
mod cli;
mod color;
mod data;
mod request;
mod scene;
mod state;
mod ui;

use app::ClimateSlidesApp;
use clap::Parser;
use cli::Args;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();
    log::debug!("arguments: {args:?}");

    let state = AppState::new(
        args.data.clone(),
        args.start_scene(),
        args.precipitation_ceiling,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Slides",
        options,
        Box::new(move |cc| Ok(Box::new(ClimateSlidesApp::new(cc, state)))),
    )
}
