//! Short confirmation messages shown over the grid.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use client_core::NotificationChannel;
use crossbeam_channel::{Sender, TrySendError};

use crate::controller::events::UiEvent;

/// Roughly a platform "short" toast.
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Routes favorite confirmations back through the UI event queue.
pub struct ToastChannel {
    ui_tx: Sender<UiEvent>,
}

impl ToastChannel {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

impl NotificationChannel for ToastChannel {
    fn send(&self, message: &str) -> Result<()> {
        match self.ui_tx.try_send(UiEvent::Toast(message.to_string())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(anyhow!("ui event queue is full")),
            Err(TrySendError::Disconnected(_)) => Err(anyhow!("ui event queue disconnected")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    expires_at: Instant,
}

/// The single visible toast; a newer message replaces the current one.
#[derive(Debug, Default)]
pub struct ToastState {
    current: Option<Toast>,
}

impl ToastState {
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            expires_at: now + TOAST_DURATION,
        });
    }

    pub fn visible(&mut self, now: Instant) -> Option<&Toast> {
        if self
            .current
            .as_ref()
            .is_some_and(|toast| now >= toast.expires_at)
        {
            self.current = None;
        }
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn channel_forwards_message_as_ui_event() {
        let (tx, rx) = bounded(4);
        let channel = ToastChannel::new(tx);

        channel.send("Image added to favorites").expect("send");

        match rx.try_recv() {
            Ok(UiEvent::Toast(message)) => assert_eq!(message, "Image added to favorites"),
            _ => panic!("expected toast event"),
        }
    }

    #[test]
    fn closed_queue_is_an_error_not_a_panic() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let channel = ToastChannel::new(tx);

        assert!(channel.send("Image removed from favorites").is_err());
    }

    #[test]
    fn toast_expires_and_newer_message_replaces_older() {
        let start = Instant::now();
        let mut state = ToastState::default();

        state.show("Image added to favorites", start);
        state.show("Image removed from favorites", start + Duration::from_millis(500));

        let visible = state
            .visible(start + Duration::from_secs(2))
            .expect("still visible");
        assert_eq!(visible.message, "Image removed from favorites");

        assert!(state.visible(start + Duration::from_secs(3)).is_none());
    }
}
