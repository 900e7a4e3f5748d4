//! The photo grid window: drains backend events, renders the current
//! pagination snapshot, and turns scroll/click input into commands.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use client_core::{FavoritesTracker, PaginationAction, PaginationSnapshot};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use shared::domain::{Photo, PhotoId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::{
    toast::{ToastChannel, ToastState},
    view_state::{
        cover_uv, should_load_more, should_queue_load_more, GalleryView, GridLayout,
        EMPTY_STATE_MESSAGE, GAP,
    },
};

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const CARD_CORNER_RADIUS: f32 = 8.0;
const BADGE_RADIUS: f32 = 16.0;
const BADGE_INSET: f32 = 8.0;
const FOOTER_HEIGHT: f32 = 48.0;
const MAX_EVENTS_PER_FRAME: usize = 256;

/// Decoded RGBA pixels handed from the worker to the UI thread.
pub(crate) struct ThumbnailImage {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) rgba: Vec<u8>,
}

enum ThumbnailState {
    Pending,
    Ready(egui::TextureHandle),
    Failed,
}

pub struct PhotoGridApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: PaginationSnapshot,
    favorites: FavoritesTracker,
    thumbnails: HashMap<PhotoId, ThumbnailState>,
    toast: ToastState,
    status: String,
    status_banner: Option<UiError>,
    // Set when a load-more is queued; cleared by the next snapshot.
    load_more_requested: bool,
}

impl PhotoGridApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        ui_tx: Sender<UiEvent>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: PaginationSnapshot::mounting(),
            favorites: FavoritesTracker::new(Arc::new(ToastChannel::new(ui_tx))),
            thumbnails: HashMap::new(),
            toast: ToastState::default(),
            status: String::new(),
            status_banner: None,
            load_more_requested: false,
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn paginate(&mut self, action: PaginationAction) {
        if action == PaginationAction::LoadMore {
            self.load_more_requested = true;
        }
        self.queue(BackendCommand::Paginate(action));
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        for _ in 0..MAX_EVENTS_PER_FRAME {
            let event = match self.ui_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.status_banner.is_none() {
                        self.status_banner = Some(UiError::from_message(
                            "Backend worker disconnected; restart the app",
                        ));
                    }
                    break;
                }
            };

            match event {
                UiEvent::Pagination(snapshot) => {
                    if snapshot.photos != self.snapshot.photos {
                        retain_listed(&mut self.thumbnails, &snapshot.photos);
                    }
                    self.snapshot = snapshot;
                    self.load_more_requested = false;
                }
                UiEvent::ThumbnailLoaded { photo_id, image } => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    let texture = ctx.load_texture(
                        format!("photo-thumbnail:{photo_id}"),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.thumbnails
                        .insert(photo_id, ThumbnailState::Ready(texture));
                }
                UiEvent::ThumbnailFailed { photo_id, reason } => {
                    tracing::debug!(photo_id = %photo_id, "thumbnail unavailable: {reason}");
                    self.thumbnails.insert(photo_id, ThumbnailState::Failed);
                }
                UiEvent::Toast(message) => self.toast.show(message, Instant::now()),
                UiEvent::Error(err) => {
                    tracing::error!(category = ?err.category(), "{}", err.message());
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Photos");
            ui.label(
                egui::RichText::new(format!(
                    "{} loaded · {} favorite",
                    self.snapshot.photos.len(),
                    self.favorites.len()
                ))
                .weak(),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let idle = !self.snapshot.loading() && !self.snapshot.loading_more();
                if ui
                    .add_enabled(idle, egui::Button::new("Refresh"))
                    .on_hover_text("Reload from the first page (F5)")
                    .clicked()
                {
                    self.paginate(PaginationAction::Refresh);
                }
                if self.snapshot.refreshing() {
                    ui.add(egui::Spinner::new());
                }
            });
        });

        if !self.status.is_empty() {
            ui.small(egui::RichText::new(&self.status).weak());
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner.banner_text()).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(GAP);
    }

    fn show_gallery(&mut self, ui: &mut egui::Ui) {
        match GalleryView::derive(&self.snapshot) {
            GalleryView::InitialLoading => {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new().size(36.0));
                });
            }
            GalleryView::Error { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.label(egui::RichText::new(message).color(egui::Color32::RED));
                    ui.add_space(GAP);
                    if ui.button("Retry").clicked() {
                        self.paginate(PaginationAction::Retry);
                    }
                });
            }
            GalleryView::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(EMPTY_STATE_MESSAGE);
                });
            }
            GalleryView::Grid {
                show_footer_spinner,
                ..
            } => self.show_grid(ui, show_footer_spinner),
        }
    }

    fn show_grid(&mut self, ui: &mut egui::Ui, show_footer_spinner: bool) {
        let mut toggled: Option<PhotoId> = None;
        let mut wanted: Vec<(PhotoId, String)> = Vec::new();
        let mut retry_load_more = false;

        let output = egui::ScrollArea::vertical()
            .id_salt("photo_grid")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let layout = GridLayout::for_width(ui.available_width());
                let rows = GridLayout::row_count(self.snapshot.photos.len());
                let grid_height = rows as f32 * (layout.item_height + GAP) + GAP;
                let (grid_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), grid_height),
                    egui::Sense::hover(),
                );

                for (index, photo) in self.snapshot.photos.iter().enumerate() {
                    let (row, column) = GridLayout::cell(index);
                    let min = grid_rect.min
                        + egui::vec2(
                            layout.column_offset(column),
                            GAP + row as f32 * (layout.item_height + GAP),
                        );
                    let card = egui::Rect::from_min_size(
                        min,
                        egui::vec2(layout.item_width, layout.item_height),
                    );
                    if !ui.is_rect_visible(card) {
                        continue;
                    }

                    let response = ui
                        .interact(card, ui.id().with(("photo_card", &photo.id)), egui::Sense::click())
                        .on_hover_text(format!("{} · {}x{}", photo.author, photo.width, photo.height));
                    if response.clicked() {
                        toggled = Some(photo.id.clone());
                    }

                    match self.thumbnails.get(&photo.id) {
                        Some(ThumbnailState::Ready(texture)) => {
                            let size = texture.size_vec2();
                            let uv = cover_uv(size.x, size.y, card.width(), card.height());
                            ui.painter()
                                .rect_filled(card, CARD_CORNER_RADIUS, egui::Color32::from_gray(230));
                            ui.painter()
                                .image(texture.id(), card, uv, egui::Color32::WHITE);
                        }
                        Some(ThumbnailState::Failed) => {
                            ui.painter()
                                .rect_filled(card, CARD_CORNER_RADIUS, egui::Color32::from_gray(210));
                            ui.painter().text(
                                card.center(),
                                egui::Align2::CENTER_CENTER,
                                &photo.author,
                                egui::FontId::proportional(13.0),
                                egui::Color32::from_gray(90),
                            );
                        }
                        Some(ThumbnailState::Pending) => {
                            ui.painter()
                                .rect_filled(card, CARD_CORNER_RADIUS, egui::Color32::from_gray(230));
                        }
                        None => {
                            ui.painter()
                                .rect_filled(card, CARD_CORNER_RADIUS, egui::Color32::from_gray(230));
                            wanted.push((photo.id.clone(), photo.download_url.clone()));
                        }
                    }

                    paint_favorite_badge(ui.painter(), card, self.favorites.is_favorite(&photo.id));
                }

                if show_footer_spinner {
                    ui.allocate_ui(egui::vec2(ui.available_width(), FOOTER_HEIGHT), |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.add(egui::Spinner::new());
                        });
                    });
                } else if let Some(error) = self.snapshot.error.as_deref() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(GAP);
                        ui.label(egui::RichText::new(error).color(egui::Color32::RED).small());
                        if ui.button("Load more").clicked() {
                            retry_load_more = true;
                        }
                        ui.add_space(GAP);
                    });
                }
            });

        for (photo_id, url) in wanted {
            self.thumbnails
                .insert(photo_id.clone(), ThumbnailState::Pending);
            self.queue(BackendCommand::FetchThumbnail { photo_id, url });
        }

        if let Some(photo_id) = toggled {
            let change = self.favorites.toggle(&photo_id);
            tracing::debug!(photo_id = %photo_id, ?change, "favorite toggled");
        }

        let end_reached = should_load_more(
            output.state.offset.y,
            output.content_size.y,
            output.inner_rect.height(),
        );
        if should_queue_load_more(
            &self.snapshot,
            end_reached,
            retry_load_more,
            self.load_more_requested,
        ) {
            self.paginate(PaginationAction::LoadMore);
        }
    }

    fn show_toast(&mut self, ctx: &egui::Context) {
        let Some(toast) = self.toast.visible(Instant::now()) else {
            return;
        };
        let message = toast.message.clone();
        egui::Area::new(egui::Id::new("favorite_toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(200))
                    .corner_radius(16.0)
                    .inner_margin(egui::Margin::symmetric(14, 8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
                    });
            });
    }
}

fn favorite_glyph(is_favorite: bool) -> &'static str {
    if is_favorite {
        "♥"
    } else {
        "♡"
    }
}

fn paint_favorite_badge(painter: &egui::Painter, card: egui::Rect, is_favorite: bool) {
    let center = egui::pos2(
        card.max.x - BADGE_INSET - BADGE_RADIUS,
        card.min.y + BADGE_INSET + BADGE_RADIUS,
    );
    let (fill, glyph_color) = if is_favorite {
        (
            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            egui::Color32::from_rgb(220, 40, 60),
        )
    } else {
        (egui::Color32::from_black_alpha(128), egui::Color32::WHITE)
    };
    painter.circle_filled(center, BADGE_RADIUS, fill);
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        favorite_glyph(is_favorite),
        egui::FontId::proportional(18.0),
        glyph_color,
    );
}

/// Drops cached thumbnails for photos no longer in the list.
fn retain_listed<T>(cache: &mut HashMap<PhotoId, T>, photos: &[Photo]) {
    let listed: HashSet<&PhotoId> = photos.iter().map(|photo| &photo.id).collect();
    cache.retain(|id, _| listed.contains(id));
}

impl eframe::App for PhotoGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        if ctx.input(|i| i.key_pressed(egui::Key::F5))
            && !self.snapshot.loading()
            && !self.snapshot.loading_more()
        {
            self.paginate(PaginationAction::Refresh);
        }

        egui::TopBottomPanel::top("photo_grid_header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_header(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                self.show_gallery(ui);
            });

        self.show_toast(ctx);
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

impl Drop for PhotoGridApp {
    fn drop(&mut self) {
        // The worker tears the controller down when it sees this.
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
