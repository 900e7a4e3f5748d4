use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{
    domain::Photo,
    protocol::{PageRequest, PageResult, DEFAULT_PAGE_LIMIT},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, CatalogError};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Refresh,
    LoadMore,
}

impl FetchKind {
    fn replaces_list(self) -> bool {
        matches!(self, FetchKind::Initial | FetchKind::Refresh)
    }

    fn label(self) -> &'static str {
        match self {
            FetchKind::Initial => "initial",
            FetchKind::Refresh => "refresh",
            FetchKind::LoadMore => "load_more",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationAction {
    Refresh,
    LoadMore,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSnapshot {
    pub photos: Vec<Photo>,
    pub page: u32,
    pub has_more: bool,
    pub in_flight: Option<FetchKind>,
    pub error: Option<String>,
}

impl PaginationSnapshot {
    pub fn mounting() -> Self {
        PaginationState::mounting().snapshot()
    }

    // Initial, retry and refresh all replace the list.
    pub fn loading(&self) -> bool {
        self.in_flight.is_some_and(FetchKind::replaces_list)
    }

    pub fn refreshing(&self) -> bool {
        self.in_flight == Some(FetchKind::Refresh)
    }

    pub fn loading_more(&self) -> bool {
        self.in_flight == Some(FetchKind::LoadMore)
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum PaginationEvent {
    StateChanged(PaginationSnapshot),
}

struct PaginationState {
    photos: Vec<Photo>,
    page: u32,
    has_more: bool,
    in_flight: Option<FetchKind>,
    error: Option<String>,
}

impl PaginationState {
    fn mounting() -> Self {
        Self {
            photos: Vec::new(),
            page: 1,
            has_more: true,
            in_flight: Some(FetchKind::Initial),
            error: None,
        }
    }

    fn snapshot(&self) -> PaginationSnapshot {
        PaginationSnapshot {
            photos: self.photos.clone(),
            page: self.page,
            has_more: self.has_more,
            in_flight: self.in_flight,
            error: self.error.clone(),
        }
    }

    fn begin(&mut self, kind: FetchKind) {
        self.in_flight = Some(kind);
        self.error = None;
        if kind == FetchKind::Refresh {
            self.has_more = true;
        }
    }

    fn settle(
        &mut self,
        kind: FetchKind,
        request: PageRequest,
        outcome: Result<PageResult, CatalogError>,
    ) {
        self.in_flight = None;
        match outcome {
            Ok(result) => {
                if kind.replaces_list() {
                    self.photos = result.photos;
                } else {
                    self.photos.extend(result.photos);
                }
                self.has_more = result.has_more;
                self.page = request.page;
                self.error = None;
            }
            Err(err) => {
                warn!(kind = kind.label(), page = request.page, "photo fetch failed: {err}");
                self.error = Some(err.to_string());
            }
        }
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PaginationController {
    catalog: Arc<dyn CatalogClient>,
    page_size: u32,
    state: Mutex<PaginationState>,
    busy: AtomicBool,
    torn_down: AtomicBool,
    events: broadcast::Sender<PaginationEvent>,
}

impl PaginationController {
    pub fn new(catalog: Arc<dyn CatalogClient>, page_size: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            page_size
        };
        Arc::new(Self {
            catalog,
            page_size,
            state: Mutex::new(PaginationState::mounting()),
            busy: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            events,
        })
    }

    pub fn mount(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.start().await })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PaginationEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> PaginationSnapshot {
        self.state.lock().await.snapshot()
    }

    fn first_page(&self) -> PageRequest {
        PageRequest {
            page: 1,
            limit: self.page_size,
        }
    }

    pub async fn start(&self) {
        self.fetch(FetchKind::Initial, self.first_page()).await;
    }

    pub async fn retry(&self) {
        self.fetch(FetchKind::Initial, self.first_page()).await;
    }

    // Not gated on has_more.
    pub async fn refresh(&self) {
        self.fetch(FetchKind::Refresh, self.first_page()).await;
    }

    pub async fn load_more(&self) {
        let request = {
            let state = self.state.lock().await;
            let loading = state.in_flight.is_some_and(FetchKind::replaces_list);
            let loading_more = state.in_flight == Some(FetchKind::LoadMore);
            if loading_more || loading || !state.has_more {
                debug!(
                    loading,
                    loading_more,
                    has_more = state.has_more,
                    "load_more ignored"
                );
                return;
            }
            PageRequest {
                page: state.page,
                limit: self.page_size,
            }
            .next()
        };
        self.fetch(FetchKind::LoadMore, request).await;
    }

    pub async fn dispatch(&self, action: PaginationAction) {
        match action {
            PaginationAction::Refresh => self.refresh().await,
            PaginationAction::LoadMore => self.load_more().await,
            PaginationAction::Retry => self.retry().await,
        }
    }

    /// In-flight results are dropped once this is called; later actions are no-ops.
    pub fn teardown(&self) {
        if !self.torn_down.swap(true, Ordering::AcqRel) {
            info!("pagination controller torn down");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    async fn fetch(&self, kind: FetchKind, request: PageRequest) {
        let page = request.page;
        if self.is_torn_down() {
            debug!(kind = kind.label(), "controller torn down; action ignored");
            return;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(kind = kind.label(), "fetch already in flight; action dropped");
            return;
        }
        let busy = BusyGuard(&self.busy);

        let started = {
            let mut state = self.state.lock().await;
            state.begin(kind);
            state.snapshot()
        };
        self.publish(started);
        debug!(kind = kind.label(), page, limit = self.page_size, "fetch started");

        let outcome = self.catalog.list_photos(request).await;

        if self.is_torn_down() {
            debug!(kind = kind.label(), page, "discarding result after teardown");
            return;
        }

        let settled = {
            let mut state = self.state.lock().await;
            state.settle(kind, request, outcome);
            state.snapshot()
        };
        info!(
            kind = kind.label(),
            page = settled.page,
            count = settled.photos.len(),
            has_more = settled.has_more,
            failed = settled.error.is_some(),
            "fetch settled"
        );
        // Settled goes out before the gate opens so snapshots follow gate order.
        self.publish(settled);
        drop(busy);
    }

    fn publish(&self, snapshot: PaginationSnapshot) {
        // No subscribers is fine; snapshot() still serves the latest state.
        let _ = self.events.send(PaginationEvent::StateChanged(snapshot));
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
