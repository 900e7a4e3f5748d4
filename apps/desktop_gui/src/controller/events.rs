//! UI/backend events and error modeling for the desktop photo grid.

use client_core::PaginationSnapshot;
use shared::domain::PhotoId;

use crate::ui::app::ThumbnailImage;

pub enum UiEvent {
    Pagination(PaginationSnapshot),
    ThumbnailLoaded {
        photo_id: PhotoId,
        image: ThumbnailImage,
    },
    ThumbnailFailed {
        photo_id: PhotoId,
        reason: String,
    },
    Toast(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid") || message_lower.contains("relative url")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("runtime")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self { category, message }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        let label = match self.category {
            UiErrorCategory::Configuration => "Configuration",
            UiErrorCategory::Transport => "Connection",
            UiErrorCategory::Unknown => "Error",
        };
        format!("{label}: {}", self.message)
    }
}
