//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, HttpCatalogClient, PaginationController, PaginationEvent};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::ui::app::ThumbnailImage;

const THUMBNAIL_MAX_EDGE: u32 = 512;

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(serve(settings, cmd_rx, ui_tx));
        tracing::info!("backend worker stopped");
    });
}

async fn serve(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let catalog = match HttpCatalogClient::from_settings(&settings) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => {
            tracing::error!("backend worker startup failure: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                format!("backend worker startup failure: {err}"),
            )));
            return;
        }
    };
    tracing::info!(
        base_url = catalog.base_url(),
        page_size = settings.page_size,
        "backend worker ready"
    );

    let controller = PaginationController::new(catalog.clone(), settings.page_size);
    let mut events = controller.subscribe();
    let ui_tx_events = ui_tx.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(PaginationEvent::StateChanged(snapshot)) => {
                    let _ = ui_tx_events.try_send(UiEvent::Pagination(snapshot));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "ui lagged behind pagination events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
    controller.mount();

    // Blocking intake mirrors the UI side; every action runs as its own task
    // so the controller's busy gate, not this loop, decides what proceeds.
    while let Ok(cmd) = cmd_rx.recv() {
        tracing::debug!(command = cmd.name(), "backend: command received");
        match cmd {
            BackendCommand::Paginate(action) => {
                let controller = controller.clone();
                tokio::spawn(async move { controller.dispatch(action).await });
            }
            BackendCommand::FetchThumbnail { photo_id, url } => {
                let catalog = catalog.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = match load_thumbnail(&catalog, &url).await {
                        Ok(image) => UiEvent::ThumbnailLoaded { photo_id, image },
                        Err(reason) => {
                            tracing::warn!(photo_id = %photo_id, url = %url, "thumbnail failed: {reason}");
                            UiEvent::ThumbnailFailed { photo_id, reason }
                        }
                    };
                    let _ = ui_tx.try_send(event);
                });
            }
            BackendCommand::Shutdown => break,
        }
    }

    controller.teardown();
    forward_task.abort();
}

async fn load_thumbnail(catalog: &HttpCatalogClient, url: &str) -> Result<ThumbnailImage, String> {
    let bytes = catalog
        .fetch_image(url)
        .await
        .map_err(|err| err.to_string())?;
    tokio::task::spawn_blocking(move || decode_thumbnail(&bytes))
        .await
        .map_err(|err| format!("thumbnail decode task failed: {err}"))?
}

pub(crate) fn decode_thumbnail(bytes: &[u8]) -> Result<ThumbnailImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE)
        .to_rgba8();
    Ok(ThumbnailImage {
        width: resized.width() as usize,
        height: resized.height() as usize,
        rgba: resized.into_raw(),
    })
}
