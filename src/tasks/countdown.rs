//! Countdown decrement loop

use std::sync::Arc;
use tokio::time::sleep;
use tracing::debug;

use crate::timer::engine::{EngineShared, LoopStatus, TICK};

/// Decrement loop owned by the countdown of `epoch`
///
/// Ticks on a fixed one second delay, so scheduling delays accumulate as drift.
/// Exits as soon as a newer epoch is published, or once the countdown reaches zero.
pub(crate) async fn countdown_task(shared: Arc<EngineShared>, epoch: u64) {
    debug!("Starting countdown loop for epoch {}", epoch);

    let mut epoch_rx = shared.subscribe_epoch();

    loop {
        match shared.status(epoch) {
            LoopStatus::Running => {}
            LoopStatus::Finished => return,
            LoopStatus::Superseded => {
                debug!("Countdown loop {} superseded", epoch);
                return;
            }
        }

        tokio::select! {
            _ = sleep(TICK) => {}
            _ = epoch_rx.changed() => {
                debug!("Countdown loop {} cancelled", epoch);
                return;
            }
        }

        match shared.tick(epoch) {
            Some(state) => shared.foreground.refresh(&state),
            None => {
                debug!("Countdown loop {} superseded", epoch);
                return;
            }
        }
    }
}
