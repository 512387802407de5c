//! Countdown - A background countdown timer with an observable state API
//! 
//! This library provides a countdown engine that survives its presentation
//! clients, the observable state they subscribe to, and an HTTP surface for
//! entering durations and controlling the countdown.

pub mod config;
pub mod state;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, CountdownState, StateBridge, TargetDigits, ThemePreference};
pub use timer::TimerEngine;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
