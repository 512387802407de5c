//! Main application state management

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{
    CountdownState, ScreenState, StateBridge, TargetDigits, ThemePreference, ThemeUpdate,
};
use crate::{
    services::{ForegroundHost, NotificationSink},
    timer::TimerEngine,
    utils::format::format_uptime,
};

/// Reasons an editor operation cannot proceed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("a countdown is already running")]
    TimerActive,
    #[error("the editor is not open")]
    NotEditing,
    #[error("no duration has been entered")]
    NothingEntered,
    #[error("{0}")]
    Lock(String),
}

/// Main application state: the engine, the editor session and server metadata
#[derive(Debug)]
pub struct AppState {
    /// Countdown engine, publishing to `bridge`
    pub engine: TimerEngine,
    pub bridge: StateBridge,
    /// Digits being entered; `Some` while the editor is open
    editor: Mutex<Option<TargetDigits>>,
    /// Last committed digits, used by reset
    last_target: Mutex<Option<TargetDigits>>,
    /// Number of attached presentation clients
    presenters: AtomicUsize,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with an idle engine
    pub fn new(port: u16, host: String, notifications: Arc<dyn NotificationSink>) -> Self {
        let bridge = StateBridge::new();
        let foreground = Arc::new(ForegroundHost::new(notifications));

        Self {
            engine: TimerEngine::new(bridge.clone(), foreground),
            bridge,
            editor: Mutex::new(None),
            last_target: Mutex::new(None),
            presenters: AtomicUsize::new(0),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Record the last command for the status endpoint
    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Start a countdown of `seconds`, closing any open editor
    pub fn start_timer(&self, seconds: u64, start_immediately: bool) -> Result<CountdownState, String> {
        let mut editor = self
            .editor
            .lock()
            .map_err(|e| format!("Failed to lock editor state: {}", e))?;
        let state = self.engine.start(seconds, start_immediately)?;
        close_editor(&mut editor);
        drop(editor);

        self.promote_if_unwatched();
        self.record_action("start");
        Ok(state)
    }

    /// Keep a countdown started with no presenter attached visible in the foreground
    fn promote_if_unwatched(&self) {
        if self.presenter_count() > 0 {
            return;
        }
        if let Err(e) = self.engine.promote_if_active() {
            warn!("Failed to promote countdown: {}", e);
        }
    }

    /// Pause the countdown; false when idle
    pub fn pause_timer(&self) -> Result<bool, String> {
        let paused = self.engine.pause()?;
        if paused {
            self.record_action("pause");
        }
        Ok(paused)
    }

    /// Resume the countdown; false when idle
    pub fn resume_timer(&self) -> Result<bool, String> {
        let resumed = self.engine.resume()?;
        if resumed {
            self.record_action("resume");
        }
        Ok(resumed)
    }

    /// Add time to the countdown; false when idle
    pub fn add_time(&self, seconds: i64) -> Result<bool, String> {
        let added = self.engine.add_time(seconds)?;
        if added {
            self.record_action("add-time");
        }
        Ok(added)
    }

    /// Cancel the countdown; false when idle
    pub fn cancel_timer(&self) -> Result<bool, String> {
        let cancelled = self.engine.cancel()?;
        if cancelled {
            self.record_action("cancel");
        }
        Ok(cancelled)
    }

    /// Restart the countdown from the last committed target, paused
    pub fn reset_timer(&self) -> Result<CountdownState, EditorError> {
        let seconds = lock(&self.last_target)?
            .as_ref()
            .map(TargetDigits::to_seconds)
            .ok_or(EditorError::NothingEntered)?;

        let mut editor = lock(&self.editor)?;
        let state = self.engine.start(seconds, false).map_err(EditorError::Lock)?;
        close_editor(&mut editor);
        drop(editor);

        self.promote_if_unwatched();
        self.record_action("reset");
        Ok(state)
    }

    /// Open the editor, keeping any digits already entered; only possible while idle
    pub fn open_editor(&self) -> Result<TargetDigits, EditorError> {
        let mut editor = lock(&self.editor)?;
        if self.engine.is_active() {
            return Err(EditorError::TimerActive);
        }

        let digits = editor.get_or_insert_with(TargetDigits::new).clone();
        debug!("Editor opened");
        Ok(digits)
    }

    /// Enter a digit; rejected digits leave the buffer unchanged
    pub fn push_digit(&self, digit: u8) -> Result<(TargetDigits, bool), EditorError> {
        let mut editor = lock(&self.editor)?;
        let digits = editor.as_mut().ok_or(EditorError::NotEditing)?;
        let accepted = digits.push(digit);
        if !accepted {
            debug!("Rejected digit {} for {}", digit, digits);
        }
        Ok((digits.clone(), accepted))
    }

    /// Remove the last entered digit
    pub fn pop_digit(&self) -> Result<TargetDigits, EditorError> {
        let mut editor = lock(&self.editor)?;
        let digits = editor.as_mut().ok_or(EditorError::NotEditing)?;
        digits.pop();
        Ok(digits.clone())
    }

    /// Close the editor without starting anything
    pub fn discard_editor(&self) -> Result<bool, EditorError> {
        Ok(lock(&self.editor)?.take().is_some())
    }

    /// Convert the entered digits once and start the countdown
    pub fn commit_editor(&self, start_immediately: bool) -> Result<CountdownState, EditorError> {
        let mut editor = lock(&self.editor)?;
        let digits = match editor.as_ref() {
            None => return Err(EditorError::NotEditing),
            Some(digits) if digits.is_empty() => return Err(EditorError::NothingEntered),
            Some(digits) => digits.clone(),
        };
        if self.engine.is_active() {
            return Err(EditorError::TimerActive);
        }

        let state = self
            .engine
            .start(digits.to_seconds(), start_immediately)
            .map_err(EditorError::Lock)?;
        *editor = None;
        drop(editor);

        self.promote_if_unwatched();
        info!("Committed {} ({}s)", digits, digits.to_seconds());
        *lock(&self.last_target)? = Some(digits);
        self.record_action("commit");
        Ok(state)
    }

    /// Digits currently in the editor, if it is open
    pub fn editor_digits(&self) -> Option<TargetDigits> {
        self.editor.lock().ok().and_then(|editor| editor.clone())
    }

    /// Screen a presentation client should show
    pub fn screen(&self) -> ScreenState {
        let editing = self.editor_digits().is_some();
        ScreenState::derive(editing, &self.engine.snapshot())
    }

    /// Apply a theme update; false when it was refused
    pub fn update_theme(&self, update: ThemeUpdate) -> (ThemePreference, bool) {
        let mut theme = self.bridge.theme();
        let accepted = theme.apply(update);
        if accepted {
            self.bridge.set_theme(theme);
            self.record_action("theme");
        } else {
            warn!("Refusing to force dark mode while following the system setting");
        }
        (theme, accepted)
    }

    pub fn presenter_count(&self) -> usize {
        self.presenters.load(Ordering::SeqCst)
    }

    /// Attach a presentation client; the countdown leaves the foreground
    pub fn attach_presenter(self: &Arc<Self>) -> PresenterGuard {
        if self.presenters.fetch_add(1, Ordering::SeqCst) == 0 {
            self.engine.foreground().demote();
        }
        debug!("Presenter attached ({} total)", self.presenter_count());

        PresenterGuard {
            state: Arc::clone(self),
        }
    }

    /// Detach a presentation client; the last one out promotes a running countdown
    fn detach_presenter(&self) {
        let remaining = self.presenters.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("Presenter detached ({} remaining)", remaining);

        if remaining == 0 {
            self.promote_if_unwatched();
        }
    }
}

/// Keeps a presentation client attached until dropped
#[derive(Debug)]
pub struct PresenterGuard {
    state: Arc<AppState>,
}

impl Drop for PresenterGuard {
    fn drop(&mut self) {
        self.state.detach_presenter();
    }
}

/// Close the editor, discarding its digits
fn close_editor(editor: &mut Option<TargetDigits>) {
    if let Some(digits) = editor.take() {
        debug!("Closing editor holding {}", digits);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, EditorError> {
    mutex
        .lock()
        .map_err(|e| EditorError::Lock(format!("Failed to lock editor state: {}", e)))
}
