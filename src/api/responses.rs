//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{CountdownState, ScreenState, TargetDigits, ThemePreference},
    utils::format::seconds_to_clock,
};

/// Default amount of time added by `/timer/add`
pub const DEFAULT_ADD_SECONDS: i64 = 60;

/// Body of `POST /timer/start`
///
/// Either `seconds` or `digits` must be given; `digits` wins when both are.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    pub seconds: Option<u64>,
    pub digits: Option<TargetDigits>,
    #[serde(default = "default_true")]
    pub start_immediately: bool,
}

impl StartRequest {
    /// Requested duration in seconds, if one was given
    pub fn duration(&self) -> Option<u64> {
        self.digits
            .as_ref()
            .map(TargetDigits::to_seconds)
            .or(self.seconds)
    }
}

/// Body of `POST /timer/add`
#[derive(Debug, Clone, Deserialize)]
pub struct AddTimeRequest {
    #[serde(default = "default_add_seconds")]
    pub seconds: i64,
}

impl Default for AddTimeRequest {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_ADD_SECONDS,
        }
    }
}

/// Body of `POST /editor/digits`
#[derive(Debug, Clone, Deserialize)]
pub struct DigitRequest {
    pub digit: u8,
}

/// Body of `POST /editor/commit`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitRequest {
    #[serde(default = "default_true")]
    pub start_immediately: bool,
}

/// Query of `GET /settings/theme`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeQuery {
    #[serde(default)]
    pub system_dark: bool,
}

fn default_true() -> bool {
    true
}

fn default_add_seconds() -> i64 {
    DEFAULT_ADD_SECONDS
}

/// Response of the timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: CountdownState,
    pub clock: String,
}

impl TimerResponse {
    /// Create a response describing `timer`
    pub fn new(message: impl Into<String>, timer: CountdownState) -> Self {
        Self {
            status: timer.status().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
            clock: seconds_to_clock(timer.remaining_seconds),
        }
    }
}

/// Response of the editor endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorResponse {
    pub digits: TargetDigits,
    pub display: String,
    pub seconds: u64,
    /// Whether the last entered digit was accepted
    pub accepted: bool,
}

impl EditorResponse {
    pub fn new(digits: TargetDigits, accepted: bool) -> Self {
        Self {
            display: digits.display(),
            seconds: digits.to_seconds(),
            digits,
            accepted,
        }
    }
}

/// Response of the theme endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub preference: ThemePreference,
    pub dark: bool,
    pub accepted: bool,
}

/// Status response with countdown, screen and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: CountdownState,
    pub clock: String,
    pub screen: ScreenState,
    pub timer_active: bool,
    pub foreground: bool,
    pub presenters: usize,
    pub editor: Option<TargetDigits>,
    pub theme: ThemePreference,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
