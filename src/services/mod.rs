//! Collaborators living at the edge of the timer
//! 
//! This module contains the foreground host that keeps a countdown visible
//! through a persistent notification while no presenter is attached.

pub mod foreground;

// Re-export main types
pub use foreground::{ForegroundHost, LogNotifications, Notification, NotificationSink};
