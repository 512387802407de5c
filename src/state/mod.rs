//! State management module
//! 
//! This module contains the countdown and preference state, the observable
//! bridge that publishes it, and the application state tying them together.

pub mod app_state;
pub mod bridge;
pub mod countdown_state;
pub mod target_digits;
pub mod theme;

// Re-export main types
pub use app_state::{AppState, EditorError, PresenterGuard};
pub use bridge::{CountdownWatch, StateBridge};
pub use countdown_state::{CountdownState, ScreenState};
pub use target_digits::{ParseDigitsError, TargetDigits};
pub use theme::{ThemePreference, ThemeUpdate};
