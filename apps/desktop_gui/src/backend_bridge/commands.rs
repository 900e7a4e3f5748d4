//! Backend commands queued from UI to backend worker.

use client_core::PaginationAction;
use shared::domain::PhotoId;

pub enum BackendCommand {
    Paginate(PaginationAction),
    FetchThumbnail { photo_id: PhotoId, url: String },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Paginate(PaginationAction::Refresh) => "refresh",
            BackendCommand::Paginate(PaginationAction::LoadMore) => "load_more",
            BackendCommand::Paginate(PaginationAction::Retry) => "retry",
            BackendCommand::FetchThumbnail { .. } => "fetch_thumbnail",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
