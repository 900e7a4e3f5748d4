mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, ClientSettings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::PhotoGridApp;

#[derive(Parser, Debug)]
#[command(about = "Browse the photo catalog as an infinite two-column grid")]
struct Args {
    /// Catalog base URL; the list endpoint is `<base>/list`.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
}

fn resolve_settings(args: Args, mut settings: ClientSettings) -> ClientSettings {
    if let Some(base_url) = args.base_url {
        settings = settings.with_base_url(base_url);
    }
    if let Some(page_size) = args.page_size {
        settings = settings.with_page_size(page_size);
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let settings = resolve_settings(Args::parse(), load_settings());
    tracing::info!(
        base_url = %settings.catalog_base_url,
        page_size = settings.page_size,
        "starting photo grid"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Photo Grid")
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Photo Grid",
        options,
        Box::new(|_cc| Ok(Box::new(PhotoGridApp::new(cmd_tx, ui_rx, ui_tx)))),
    )
}
