//! Observable state cells shared between the engine and its subscribers

use std::sync::Arc;

use tokio::sync::watch;

use super::{CountdownState, ThemePreference};

/// Last-value cells for the countdown and the theme
///
/// Writers publish through the cells, readers subscribe and always see the
/// latest value. Subscribing never affects the engine.
#[derive(Debug, Clone)]
pub struct StateBridge {
    cells: Arc<Cells>,
}

#[derive(Debug)]
struct Cells {
    remaining: watch::Sender<u64>,
    paused: watch::Sender<bool>,
    theme: watch::Sender<ThemePreference>,
}

impl StateBridge {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Cells {
                remaining: watch::Sender::new(0),
                paused: watch::Sender::new(false),
                theme: watch::Sender::new(ThemePreference::default()),
            }),
        }
    }

    /// Current value of both countdown cells
    pub fn snapshot(&self) -> CountdownState {
        CountdownState::new(*self.cells.remaining.borrow(), *self.cells.paused.borrow())
    }

    pub fn remaining_seconds(&self) -> u64 {
        *self.cells.remaining.borrow()
    }

    pub fn is_paused(&self) -> bool {
        *self.cells.paused.borrow()
    }

    pub fn subscribe_remaining(&self) -> watch::Receiver<u64> {
        self.cells.remaining.subscribe()
    }

    pub fn subscribe_paused(&self) -> watch::Receiver<bool> {
        self.cells.paused.subscribe()
    }

    /// Subscribe to both countdown cells at once
    pub fn subscribe(&self) -> CountdownWatch {
        CountdownWatch {
            remaining: self.subscribe_remaining(),
            paused: self.subscribe_paused(),
        }
    }

    pub fn theme(&self) -> ThemePreference {
        *self.cells.theme.borrow()
    }

    pub fn set_theme(&self, theme: ThemePreference) {
        self.cells.theme.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<ThemePreference> {
        self.cells.theme.subscribe()
    }

    /// Publish a whole countdown state; unchanged cells do not notify
    pub(crate) fn publish(&self, state: CountdownState) {
        self.set_remaining(state.remaining_seconds);
        self.set_paused(state.is_paused);
    }

    pub(crate) fn set_remaining(&self, remaining_seconds: u64) {
        self.cells.remaining.send_if_modified(|current| {
            let changed = *current != remaining_seconds;
            *current = remaining_seconds;
            changed
        });
    }

    pub(crate) fn set_paused(&self, is_paused: bool) {
        self.cells.paused.send_if_modified(|current| {
            let changed = *current != is_paused;
            *current = is_paused;
            changed
        });
    }
}

impl Default for StateBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver pair following both countdown cells
#[derive(Debug)]
pub struct CountdownWatch {
    remaining: watch::Receiver<u64>,
    paused: watch::Receiver<bool>,
}

impl CountdownWatch {
    /// Latest published state, marking it as seen
    pub fn current(&mut self) -> CountdownState {
        CountdownState::new(
            *self.remaining.borrow_and_update(),
            *self.paused.borrow_and_update(),
        )
    }

    /// Wait for either cell to change, or `None` once the bridge is gone
    pub async fn changed(&mut self) -> Option<CountdownState> {
        let result = tokio::select! {
            result = self.remaining.changed() => result,
            result = self.paused.changed() => result,
        };
        result.ok().map(|_| self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_subscribers_see_last_value() {
        let bridge = StateBridge::new();
        bridge.publish(CountdownState::new(42, true));

        let rx = bridge.subscribe_remaining();
        assert_eq!(*rx.borrow(), 42);
        assert_eq!(bridge.snapshot(), CountdownState::new(42, true));
    }

    #[test]
    fn unchanged_values_do_not_notify() {
        let bridge = StateBridge::new();
        let mut rx = bridge.subscribe_paused();
        bridge.set_paused(false);
        assert!(!rx.has_changed().unwrap());

        bridge.set_paused(true);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn watch_reports_combined_state() {
        let bridge = StateBridge::new();
        let mut watch = bridge.subscribe();
        assert_eq!(watch.current(), CountdownState::idle());

        bridge.set_remaining(7);
        assert_eq!(watch.changed().await, Some(CountdownState::new(7, false)));

        bridge.set_paused(true);
        assert_eq!(watch.changed().await, Some(CountdownState::new(7, true)));
    }

    #[tokio::test]
    async fn watch_ends_when_bridge_is_dropped() {
        let bridge = StateBridge::new();
        let mut watch = bridge.subscribe();
        drop(bridge);
        assert_eq!(watch.changed().await, None);
    }
}
