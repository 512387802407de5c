//! Countdown state structure and the derived screen state

use serde::{Deserialize, Serialize};

/// Remaining time and pause flag of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub is_paused: bool,
}

impl CountdownState {
    /// Create the idle state: nothing remaining, not paused
    pub fn idle() -> Self {
        Self::default()
    }

    /// Create a state with remaining seconds
    pub fn new(remaining_seconds: u64, is_paused: bool) -> Self {
        Self {
            remaining_seconds,
            is_paused,
        }
    }

    /// Check if there is time left on the countdown
    pub fn is_active(&self) -> bool {
        self.remaining_seconds > 0
    }

    /// Short status label used in API responses
    pub fn status(&self) -> &'static str {
        match ScreenState::derive(false, self) {
            ScreenState::Running => "running",
            ScreenState::Paused => "paused",
            _ => "idle",
        }
    }
}

/// What a presentation client should be showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenState {
    Editing,
    Idle,
    Running,
    Paused,
}

impl ScreenState {
    /// Derive the screen from the editor flag and the countdown
    pub fn derive(editing: bool, countdown: &CountdownState) -> Self {
        if editing {
            ScreenState::Editing
        } else if !countdown.is_active() {
            ScreenState::Idle
        } else if countdown.is_paused {
            ScreenState::Paused
        } else {
            ScreenState::Running
        }
    }
}
