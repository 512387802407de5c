//! Timer engine: owns the countdown and supersedes decrement loops

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::{
    services::ForegroundHost,
    state::{CountdownState, StateBridge},
    tasks::countdown_task,
};

/// Interval between two ticks of the countdown
pub const TICK: Duration = Duration::from_secs(1);

/// Handle to the countdown engine; clones share the same countdown
#[derive(Debug, Clone)]
pub struct TimerEngine {
    shared: Arc<EngineShared>,
}

/// State shared between the engine handle and its decrement loop
#[derive(Debug)]
pub(crate) struct EngineShared {
    pub(crate) bridge: StateBridge,
    pub(crate) foreground: Arc<ForegroundHost>,
    control: Mutex<LoopControl>,
    /// Broadcasts the current loop epoch so superseded loops wake up
    epoch_tx: watch::Sender<u64>,
}

/// Outcome of the loop's check at an interval boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopStatus {
    Running,
    Finished,
    Superseded,
}

/// Bookkeeping for the single active loop
#[derive(Debug, Default)]
struct LoopControl {
    epoch: u64,
    active: bool,
    handle: Option<JoinHandle<()>>,
}

impl TimerEngine {
    /// Create an idle engine publishing to `bridge`
    pub fn new(bridge: StateBridge, foreground: Arc<ForegroundHost>) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                bridge,
                foreground,
                control: Mutex::new(LoopControl::default()),
                epoch_tx: watch::Sender::new(0),
            }),
        }
    }

    pub fn bridge(&self) -> &StateBridge {
        &self.shared.bridge
    }

    pub fn foreground(&self) -> &ForegroundHost {
        &self.shared.foreground
    }

    /// Current countdown state
    pub fn snapshot(&self) -> CountdownState {
        self.shared.bridge.snapshot()
    }

    /// Check if there is time left on the countdown
    pub fn is_active(&self) -> bool {
        self.shared.bridge.remaining_seconds() > 0
    }

    /// Promote to the foreground if a countdown is running
    ///
    /// Checked under the loop lock, which is also held while a finishing or
    /// cancelled countdown demotes.
    pub fn promote_if_active(&self) -> Result<bool, String> {
        let control = self.shared.lock_control()?;
        if !control.active || !self.is_active() {
            return Ok(false);
        }

        self.shared.foreground.promote(&self.snapshot());
        Ok(true)
    }

    /// Start a countdown of `seconds`, superseding any running loop
    ///
    /// Must be called from within a tokio runtime. Starting with zero seconds
    /// only cancels the current countdown.
    pub fn start(&self, seconds: u64, start_immediately: bool) -> Result<CountdownState, String> {
        if seconds == 0 {
            warn!("Ignoring countdown start with zero seconds");
            self.cancel()?;
            return Ok(self.snapshot());
        }

        let mut control = self.shared.lock_control()?;
        let epoch = self.shared.next_epoch(&mut control);
        if control.handle.take().is_some() {
            debug!("Superseding countdown loop with epoch {}", epoch);
        }

        let state = CountdownState::new(seconds, !start_immediately);
        self.shared.bridge.publish(state);
        control.active = true;
        control.handle = Some(tokio::spawn(countdown_task(Arc::clone(&self.shared), epoch)));

        info!("Countdown started: {}s, paused={}", seconds, state.is_paused);
        Ok(state)
    }

    /// Pause the countdown; returns false when no countdown is running
    pub fn pause(&self) -> Result<bool, String> {
        self.set_paused(true)
    }

    /// Resume the countdown; returns false when no countdown is running
    pub fn resume(&self) -> Result<bool, String> {
        self.set_paused(false)
    }

    fn set_paused(&self, paused: bool) -> Result<bool, String> {
        let control = self.shared.lock_control()?;
        if !control.active {
            debug!("No active countdown, ignoring paused={}", paused);
            return Ok(false);
        }

        self.shared.bridge.set_paused(paused);
        info!("Countdown {}", if paused { "paused" } else { "resumed" });
        Ok(true)
    }

    /// Add (or with a negative value, remove) time from the running countdown
    ///
    /// Returns false without effect when no countdown is running.
    pub fn add_time(&self, seconds: i64) -> Result<bool, String> {
        let mut control = self.shared.lock_control()?;
        if !control.active {
            debug!("No active countdown, cannot add {}s", seconds);
            return Ok(false);
        }

        let remaining = self.shared.bridge.remaining_seconds().saturating_add_signed(seconds);
        self.shared.bridge.set_remaining(remaining);
        info!("Added {}s to countdown, {}s remaining", seconds, remaining);

        if remaining == 0 {
            // Removing all the time ends the countdown now rather than at the next tick
            self.shared.next_epoch(&mut control);
            self.shared.retire(&mut control);
            self.shared.foreground.demote();
            drop(control);

            info!("Countdown finished");
        }
        Ok(true)
    }

    /// Stop the countdown and reset it; returns false when nothing was running
    ///
    /// The loop notices the cancellation at its next wake-up.
    pub fn cancel(&self) -> Result<bool, String> {
        let (was_active, _) = self.stop_loop()?;
        Ok(was_active)
    }

    /// Cancel the countdown and wait for its loop to exit
    pub async fn shutdown(&self) -> Result<(), String> {
        if let (_, Some(handle)) = self.stop_loop()? {
            if let Err(e) = handle.await {
                warn!("Countdown loop ended abnormally: {}", e);
            }
        }
        Ok(())
    }

    /// Supersede the active loop and reset the countdown, handing back the loop
    fn stop_loop(&self) -> Result<(bool, Option<JoinHandle<()>>), String> {
        let mut control = self.shared.lock_control()?;
        if !control.active {
            return Ok((false, None));
        }

        let epoch = self.shared.next_epoch(&mut control);
        control.active = false;
        let handle = control.handle.take();
        self.shared.bridge.publish(CountdownState::idle());
        self.shared.foreground.demote();
        drop(control);

        info!("Countdown cancelled (epoch {})", epoch);
        Ok((true, handle))
    }
}

impl EngineShared {
    fn lock_control(&self) -> Result<MutexGuard<'_, LoopControl>, String> {
        self.control
            .lock()
            .map_err(|e| format!("Failed to lock timer control: {}", e))
    }

    /// Bump the epoch so any running loop knows it has been superseded
    fn next_epoch(&self, control: &mut LoopControl) -> u64 {
        control.epoch += 1;
        self.epoch_tx.send_replace(control.epoch);
        control.epoch
    }

    pub(crate) fn subscribe_epoch(&self) -> watch::Receiver<u64> {
        self.epoch_tx.subscribe()
    }

    /// Check whether the loop of `epoch` should keep ticking
    ///
    /// Reaching zero retires the loop in the same locked step, so time added
    /// concurrently either lands before the check or finds the engine idle.
    pub(crate) fn status(&self, epoch: u64) -> LoopStatus {
        let mut control = match self.lock_control() {
            Ok(control) => control,
            Err(e) => {
                error!("{}", e);
                return LoopStatus::Superseded;
            }
        };
        if control.epoch != epoch {
            return LoopStatus::Superseded;
        }
        if self.bridge.remaining_seconds() > 0 {
            return LoopStatus::Running;
        }

        self.retire(&mut control);
        self.foreground.demote();
        drop(control);

        info!("Countdown finished");
        LoopStatus::Finished
    }

    /// Mark the engine idle; the caller holds the control lock
    fn retire(&self, control: &mut LoopControl) {
        control.active = false;
        control.handle = None;
        self.bridge.set_paused(false);
    }

    /// Apply one tick for the loop of `epoch`
    ///
    /// Returns the state after the tick, or `None` if the loop was superseded.
    pub(crate) fn tick(&self, epoch: u64) -> Option<CountdownState> {
        let control = match self.lock_control() {
            Ok(control) => control,
            Err(e) => {
                error!("{}", e);
                return None;
            }
        };
        if control.epoch != epoch {
            return None;
        }

        let state = self.bridge.snapshot();
        if state.is_paused || state.remaining_seconds == 0 {
            return Some(state);
        }

        let remaining = state.remaining_seconds - 1;
        self.bridge.set_remaining(remaining);
        debug!("Countdown tick: {}s remaining", remaining);
        Some(CountdownState::new(remaining, state.is_paused))
    }
}
