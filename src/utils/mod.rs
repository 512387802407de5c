//! Utility functions module
//! 
//! Time formatting helpers and signal handling used throughout the application.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{digits_to_display, digits_to_seconds, format_uptime, seconds_to_clock};
pub use signals::shutdown_signal;
