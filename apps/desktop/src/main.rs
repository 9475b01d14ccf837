use anyhow::{anyhow, Result};
use eframe::{egui, NativeOptions};
use tracing_subscriber::EnvFilter;

mod app;
mod keyboard;
mod painter;
mod settings;
mod toolbar;

use app::App;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = settings::load_settings();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Timeline Editor")
            .with_inner_size([1100.0, 360.0]),
        ..NativeOptions::default()
    };
    eframe::run_native(
        "Timeline Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(settings)))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
