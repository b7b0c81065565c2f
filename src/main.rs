mod app;
mod assistant;
mod color;
mod config;
mod data;
mod render;
mod state;
mod ui;

use anyhow::{Context, anyhow};
use app::CentrosApp;
use config::Config;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("reading configuration")?;
    log::info!(
        "Starting with model {} (swap rule {:?})",
        config.assistant.model,
        config.data.swap_rule
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Visualizador de Centros Educativos",
        options,
        Box::new(move |_cc| Ok(Box::new(CentrosApp::new(&config)))),
    )
    .map_err(|e| anyhow!("UI event loop failed: {e}"))
}
