//! Pure view derivation for the photo grid: which screen to show, grid
//! geometry, and when the scroll position should ask for the next page.

use client_core::PaginationSnapshot;
use egui::{pos2, Rect};

pub const GAP: f32 = 8.0;
pub const COLUMNS: usize = 2;
/// Card height as a multiple of its width.
pub const ITEM_HEIGHT_RATIO: f32 = 1.2;
/// Fraction of the viewport height left below the fold that triggers load-more.
pub const END_REACHED_THRESHOLD: f32 = 0.5;

pub const EMPTY_STATE_MESSAGE: &str = "No data";

/// Top-level screen state, checked in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    InitialLoading,
    Error { message: String },
    Empty,
    Grid {
        show_footer_spinner: bool,
        refreshing: bool,
    },
}

impl GalleryView {
    pub fn derive(snapshot: &PaginationSnapshot) -> Self {
        let empty = snapshot.is_empty();
        if snapshot.loading() && empty {
            return GalleryView::InitialLoading;
        }
        if let (Some(message), true) = (&snapshot.error, empty) {
            return GalleryView::Error {
                message: message.clone(),
            };
        }
        if empty && !snapshot.loading() && snapshot.error.is_none() {
            return GalleryView::Empty;
        }
        GalleryView::Grid {
            show_footer_spinner: snapshot.loading_more(),
            refreshing: snapshot.refreshing(),
        }
    }
}

/// Whether a load-more request is worth queueing for this snapshot.
///
/// The controller applies the same rule; checking here keeps the command
/// queue from filling with no-ops while the user sits at the bottom.
pub fn can_request_more(snapshot: &PaginationSnapshot) -> bool {
    !snapshot.loading() && !snapshot.loading_more() && snapshot.has_more
}

/// Whether this frame queues a load-more. A failed page waits for the
/// explicit retry button instead of re-firing from the scroll position.
pub fn should_queue_load_more(
    snapshot: &PaginationSnapshot,
    end_reached: bool,
    retry_clicked: bool,
    already_requested: bool,
) -> bool {
    let triggered = retry_clicked || (end_reached && snapshot.error.is_none());
    triggered && !already_requested && can_request_more(snapshot)
}

pub fn should_load_more(scroll_offset: f32, content_height: f32, viewport_height: f32) -> bool {
    if viewport_height <= 0.0 {
        return false;
    }
    let distance_from_end = content_height - (scroll_offset + viewport_height);
    distance_from_end < viewport_height * END_REACHED_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub item_width: f32,
    pub item_height: f32,
}

impl GridLayout {
    pub fn for_width(available_width: f32) -> Self {
        let item_width = ((available_width - GAP * (COLUMNS as f32 + 1.0)) / COLUMNS as f32).max(0.0);
        Self {
            item_width,
            item_height: item_width * ITEM_HEIGHT_RATIO,
        }
    }

    /// Horizontal offset of a column's left edge from the row's left edge.
    pub fn column_offset(&self, column: usize) -> f32 {
        GAP + column as f32 * (self.item_width + GAP)
    }

    /// (row, column) of the card at `index`, filled row by row.
    pub fn cell(index: usize) -> (usize, usize) {
        (index / COLUMNS, index % COLUMNS)
    }

    pub fn row_count(item_count: usize) -> usize {
        item_count.div_ceil(COLUMNS)
    }
}

/// UV rect that crops a texture to fill a card without distortion.
pub fn cover_uv(texture_width: f32, texture_height: f32, card_width: f32, card_height: f32) -> Rect {
    let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    if texture_width <= 0.0 || texture_height <= 0.0 || card_width <= 0.0 || card_height <= 0.0 {
        return full;
    }
    let texture_aspect = texture_width / texture_height;
    let card_aspect = card_width / card_height;
    if texture_aspect > card_aspect {
        let visible = card_aspect / texture_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(inset, 0.0), pos2(1.0 - inset, 1.0))
    } else {
        let visible = texture_aspect / card_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(0.0, inset), pos2(1.0, 1.0 - inset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::FetchKind;
    use shared::domain::{Photo, PhotoId};

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|i| Photo {
                id: PhotoId::new(i.to_string()),
                author: "someone".to_string(),
                width: 300,
                height: 200,
                url: String::new(),
                download_url: format!("https://picsum.photos/id/{i}/300/200"),
            })
            .collect()
    }

    fn snapshot(
        count: usize,
        in_flight: Option<FetchKind>,
        error: Option<&str>,
    ) -> PaginationSnapshot {
        PaginationSnapshot {
            photos: photos(count),
            page: 1,
            has_more: true,
            in_flight,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn spinner_while_first_load_has_nothing_to_show() {
        let view = GalleryView::derive(&snapshot(0, Some(FetchKind::Initial), None));
        assert_eq!(view, GalleryView::InitialLoading);
    }

    #[test]
    fn error_with_no_photos_shows_error_view() {
        let view = GalleryView::derive(&snapshot(0, None, Some("Failed to fetch photos: boom")));
        assert_eq!(
            view,
            GalleryView::Error {
                message: "Failed to fetch photos: boom".to_string()
            }
        );
    }

    #[test]
    fn loading_outranks_error_when_empty() {
        let view = GalleryView::derive(&snapshot(0, Some(FetchKind::Initial), Some("stale")));
        assert_eq!(view, GalleryView::InitialLoading);
    }

    #[test]
    fn empty_catalog_shows_empty_state() {
        let view = GalleryView::derive(&snapshot(0, None, None));
        assert_eq!(view, GalleryView::Empty);
    }

    #[test]
    fn photos_with_error_still_render_grid() {
        let view = GalleryView::derive(&snapshot(4, None, Some("load more failed")));
        assert_eq!(
            view,
            GalleryView::Grid {
                show_footer_spinner: false,
                refreshing: false
            }
        );
    }

    #[test]
    fn footer_spinner_only_while_loading_more() {
        let view = GalleryView::derive(&snapshot(4, Some(FetchKind::LoadMore), None));
        assert_eq!(
            view,
            GalleryView::Grid {
                show_footer_spinner: true,
                refreshing: false
            }
        );

        let view = GalleryView::derive(&snapshot(4, Some(FetchKind::Refresh), None));
        assert_eq!(
            view,
            GalleryView::Grid {
                show_footer_spinner: false,
                refreshing: true
            }
        );
    }

    #[test]
    fn load_more_request_gate_matches_controller_rule() {
        assert!(can_request_more(&snapshot(20, None, None)));
        assert!(!can_request_more(&snapshot(20, Some(FetchKind::LoadMore), None)));
        assert!(!can_request_more(&snapshot(20, Some(FetchKind::Refresh), None)));

        let mut exhausted = snapshot(20, None, None);
        exhausted.has_more = false;
        assert!(!can_request_more(&exhausted));
    }

    #[test]
    fn end_reached_with_error_set_queues_nothing() {
        let failed = snapshot(20, None, Some("Failed to fetch photos: HTTP error! status: 503"));
        assert!(!should_queue_load_more(&failed, true, false, false));
    }

    #[test]
    fn retry_button_queues_after_failed_page_while_more_remain() {
        let failed = snapshot(20, None, Some("Failed to fetch photos: HTTP error! status: 503"));
        assert!(should_queue_load_more(&failed, false, true, false));

        let mut exhausted = failed.clone();
        exhausted.has_more = false;
        assert!(!should_queue_load_more(&exhausted, false, true, false));
    }

    #[test]
    fn end_reached_queues_once_until_next_snapshot() {
        let idle = snapshot(20, None, None);
        assert!(should_queue_load_more(&idle, true, false, false));
        assert!(!should_queue_load_more(&idle, true, false, true));
        assert!(!should_queue_load_more(&idle, false, false, false));
    }

    #[test]
    fn nothing_queued_while_a_fetch_is_in_flight() {
        let busy = snapshot(20, Some(FetchKind::LoadMore), None);
        assert!(!should_queue_load_more(&busy, true, true, false));
    }

    #[test]
    fn end_reached_within_half_a_viewport() {
        assert!(!should_load_more(0.0, 2000.0, 600.0));
        assert!(!should_load_more(1100.0, 2000.0, 600.0));
        assert!(should_load_more(1200.0, 2000.0, 600.0));
        assert!(should_load_more(0.0, 300.0, 600.0));
        assert!(!should_load_more(0.0, 300.0, 0.0));
    }

    #[test]
    fn two_column_geometry() {
        let layout = GridLayout::for_width(400.0);
        assert_eq!(layout.item_width, 188.0);
        assert!((layout.item_height - 225.6).abs() < 1e-3);
        assert_eq!(layout.column_offset(0), 8.0);
        assert_eq!(layout.column_offset(1), 204.0);
        assert_eq!(GridLayout::row_count(34), 17);
        assert_eq!(GridLayout::row_count(5), 3);
        assert_eq!(GridLayout::for_width(10.0).item_width, 0.0);
    }

    #[test]
    fn cards_fill_rows_left_to_right() {
        assert_eq!(GridLayout::cell(0), (0, 0));
        assert_eq!(GridLayout::cell(1), (0, 1));
        assert_eq!(GridLayout::cell(2), (1, 0));
        assert_eq!(GridLayout::cell(33), (16, 1));
    }

    #[test]
    fn cover_crops_wide_images_horizontally() {
        let uv = cover_uv(400.0, 200.0, 100.0, 100.0);
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);

        let uv = cover_uv(100.0, 400.0, 100.0, 100.0);
        assert!((uv.min.y - 0.375).abs() < 1e-6);
        assert_eq!(uv.min.x, 0.0);
    }
}
