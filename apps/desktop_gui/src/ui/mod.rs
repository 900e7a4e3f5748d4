//! UI layer for the desktop photo grid: app shell, toast overlay, and view derivation.

pub mod app;
pub mod toast;
pub mod view_state;
