use std::{collections::HashSet, sync::Arc};

use anyhow::Result;
use shared::domain::PhotoId;
use tracing::{debug, warn};

pub const ADDED_TO_FAVORITES_MESSAGE: &str = "Image added to favorites";
pub const REMOVED_FROM_FAVORITES_MESSAGE: &str = "Image removed from favorites";

pub trait NotificationChannel: Send + Sync {
    fn send(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

impl FavoriteChange {
    pub fn message(self) -> &'static str {
        match self {
            FavoriteChange::Added => ADDED_TO_FAVORITES_MESSAGE,
            FavoriteChange::Removed => REMOVED_FROM_FAVORITES_MESSAGE,
        }
    }
}

#[derive(Default)]
pub struct FavoritesTracker {
    favorites: HashSet<PhotoId>,
    notifier: Option<Arc<dyn NotificationChannel>>,
}

impl FavoritesTracker {
    pub fn new(notifier: Arc<dyn NotificationChannel>) -> Self {
        Self {
            favorites: HashSet::new(),
            notifier: Some(notifier),
        }
    }

    pub fn without_notifications() -> Self {
        Self::default()
    }

    /// The membership change sticks even when the confirmation fails.
    pub fn toggle(&mut self, id: &PhotoId) -> FavoriteChange {
        let change = if self.favorites.remove(id) {
            FavoriteChange::Removed
        } else {
            self.favorites.insert(id.clone());
            FavoriteChange::Added
        };

        match &self.notifier {
            Some(notifier) => {
                if let Err(err) = notifier.send(change.message()) {
                    warn!(photo_id = %id, "favorite confirmation failed: {err:#}");
                }
            }
            None => debug!(photo_id = %id, "no notification channel; confirmation skipped"),
        }

        change
    }

    pub fn is_favorite(&self, id: &PhotoId) -> bool {
        self.favorites.contains(id)
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PhotoId> {
        self.favorites.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;

    use super::*;

    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<String>>,
    }

    impl NotificationChannel for RecordingChannel {
        fn send(&self, message: &str) -> Result<()> {
            self.sent
                .lock()
                .expect("sent lock")
                .push(message.to_string());
            Ok(())
        }
    }

    struct BrokenChannel;

    impl NotificationChannel for BrokenChannel {
        fn send(&self, _message: &str) -> Result<()> {
            Err(anyhow!("toast service unavailable"))
        }
    }

    #[test]
    fn double_toggle_restores_membership_and_notifies_each_time() {
        let channel = Arc::new(RecordingChannel::default());
        let mut tracker = FavoritesTracker::new(channel.clone());
        let id = PhotoId::from("42");

        assert_eq!(tracker.toggle(&id), FavoriteChange::Added);
        assert!(tracker.is_favorite(&id));
        assert_eq!(tracker.toggle(&id), FavoriteChange::Removed);
        assert!(!tracker.is_favorite(&id));
        assert!(tracker.is_empty());

        let sent = channel.sent.lock().expect("sent lock");
        assert_eq!(
            sent.as_slice(),
            &[
                "Image added to favorites".to_string(),
                "Image removed from favorites".to_string()
            ]
        );
    }

    #[test]
    fn failing_channel_does_not_roll_back_toggle() {
        let mut tracker = FavoritesTracker::new(Arc::new(BrokenChannel));
        let id = PhotoId::from("7");

        assert_eq!(tracker.toggle(&id), FavoriteChange::Added);
        assert!(tracker.is_favorite(&id));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn missing_channel_is_tolerated() {
        let mut tracker = FavoritesTracker::without_notifications();
        let id = PhotoId::from("1");

        tracker.toggle(&id);
        assert!(tracker.is_favorite(&id));
    }

    #[test]
    fn toggles_are_independent_per_photo() {
        let mut tracker = FavoritesTracker::without_notifications();
        tracker.toggle(&PhotoId::from("1"));
        tracker.toggle(&PhotoId::from("2"));
        tracker.toggle(&PhotoId::from("1"));

        let ids: Vec<&PhotoId> = tracker.ids().collect();
        assert_eq!(ids, vec![&PhotoId::from("2")]);
        assert!(!tracker.is_favorite(&PhotoId::from("1")));
    }
}
