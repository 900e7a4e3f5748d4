use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    #[error("page must be a positive integer")]
    ZeroPage,
    #[error("limit must be a positive integer")]
    ZeroLimit,
}
