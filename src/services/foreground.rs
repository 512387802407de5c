//! Foreground promotion and the persistent countdown notification

use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{state::CountdownState, utils::format::seconds_to_clock};

/// Notification content for a running or paused countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: &'static str,
}

impl Notification {
    /// Build the notification shown for a countdown state
    pub fn for_state(state: &CountdownState) -> Self {
        Self {
            title: seconds_to_clock(state.remaining_seconds),
            message: if state.is_paused {
                "Countdown paused"
            } else {
                "Countdown in progress"
            },
        }
    }
}

/// Destination of the persistent notification
pub trait NotificationSink: Send + Sync + Debug {
    /// Show or replace the notification
    fn show(&self, notification: &Notification);
    /// Remove the notification
    fn dismiss(&self);
}

/// Sink that writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotifications;

impl NotificationSink for LogNotifications {
    fn show(&self, notification: &Notification) {
        info!("[notification] {} - {}", notification.title, notification.message);
    }

    fn dismiss(&self) {
        info!("[notification] dismissed");
    }
}

/// Keeps the countdown alive in the foreground while nobody is watching
#[derive(Debug)]
pub struct ForegroundHost {
    promoted: AtomicBool,
    sink: Arc<dyn NotificationSink>,
}

impl ForegroundHost {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            promoted: AtomicBool::new(false),
            sink,
        }
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted.load(Ordering::SeqCst)
    }

    /// Promote to the foreground and show the notification
    pub fn promote(&self, state: &CountdownState) {
        if !self.promoted.swap(true, Ordering::SeqCst) {
            info!("Promoting countdown to foreground at {}", seconds_to_clock(state.remaining_seconds));
            self.sink.show(&Notification::for_state(state));
        }
    }

    /// Leave the foreground and remove the notification
    pub fn demote(&self) {
        if self.promoted.swap(false, Ordering::SeqCst) {
            info!("Leaving foreground");
            self.sink.dismiss();
        }
    }

    /// Refresh the notification; only has an effect while promoted
    pub fn refresh(&self, state: &CountdownState) {
        if self.is_promoted() {
            debug!("Refreshing foreground notification");
            self.sink.show(&Notification::for_state(state));
        }
    }
}
