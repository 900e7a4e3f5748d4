use serde::{Deserialize, Serialize};

use crate::{domain::Photo, error::PageRequestError};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Query for one page of the catalog listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        Ok(Self { page, limit })
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One fetched page plus the client-side guess whether another exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub photos: Vec<Photo>,
    pub has_more: bool,
}

impl PageResult {
    /// A full page means more may follow; a short page marks the end.
    pub fn from_batch(photos: Vec<Photo>, limit: u32) -> Self {
        let has_more = photos.len() == limit as usize;
        Self { photos, has_more }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}
