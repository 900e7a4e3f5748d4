pub mod catalog;
pub mod config;
pub mod favorites;
pub mod pagination;

pub use catalog::{CatalogClient, CatalogError, HttpCatalogClient};
pub use config::{load_settings, ClientSettings};
pub use favorites::{
    FavoriteChange, FavoritesTracker, NotificationChannel, ADDED_TO_FAVORITES_MESSAGE,
    REMOVED_FROM_FAVORITES_MESSAGE,
};
pub use pagination::{
    FetchKind, PaginationAction, PaginationController, PaginationEvent, PaginationSnapshot,
};
