use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, FavoritesTracker, HttpCatalogClient, NotificationChannel, PaginationController,
    PaginationSnapshot,
};
use shared::domain::PhotoId;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Page through the photo catalog from the terminal")]
struct Args {
    /// Catalog base URL; the list endpoint is `<base>/list`.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Load-more steps to run after the first page.
    #[arg(long, default_value_t = 0)]
    pages: u32,
    /// Toggle this photo id as favorite (repeatable).
    #[arg(long = "favorite")]
    favorites: Vec<String>,
    /// Print the accumulated photos as JSON.
    #[arg(long)]
    json: bool,
}

struct StdoutNotifier;

impl NotificationChannel for StdoutNotifier {
    fn send(&self, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }
}

fn print_summary(snapshot: &PaginationSnapshot) {
    println!(
        "photos={} page={} has_more={}",
        snapshot.photos.len(),
        snapshot.page,
        snapshot.has_more
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(base_url) = args.base_url {
        settings = settings.with_base_url(base_url);
    }
    if let Some(page_size) = args.page_size {
        settings = settings.with_page_size(page_size);
    }

    let catalog = HttpCatalogClient::from_settings(&settings)
        .with_context(|| format!("failed to build catalog client for {}", settings.catalog_base_url))?;
    let controller = PaginationController::new(Arc::new(catalog), settings.page_size);

    controller.start().await;
    let mut snapshot = controller.snapshot().await;
    if let Some(err) = &snapshot.error {
        bail!("{err}");
    }

    for _ in 0..args.pages {
        if !snapshot.has_more {
            tracing::info!("catalog exhausted at page {}", snapshot.page);
            break;
        }
        controller.load_more().await;
        snapshot = controller.snapshot().await;
        if let Some(err) = &snapshot.error {
            tracing::warn!("stopping after load-more failure: {err}");
            break;
        }
    }
    controller.teardown();

    let mut favorites = FavoritesTracker::new(Arc::new(StdoutNotifier));
    for id in args.favorites {
        favorites.toggle(&PhotoId::new(id));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.photos)?);
    } else {
        for photo in &snapshot.photos {
            let mark = if favorites.is_favorite(&photo.id) { "*" } else { " " };
            println!(
                "{mark} {:>6}  {:<28} {}x{}  {}",
                photo.id, photo.author, photo.width, photo.height, photo.download_url
            );
        }
    }
    print_summary(&snapshot);

    Ok(())
}
