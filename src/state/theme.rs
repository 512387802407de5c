//! Theme preference held alongside the timer

use serde::{Deserialize, Serialize};

/// Theme preference, kept in memory only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    /// Follow the system's dark mode setting
    pub use_system_setting: bool,
    /// Force dark mode when not following the system
    pub dark_mode_forced: bool,
}

/// Partial update of the theme preference
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ThemeUpdate {
    pub use_system_setting: Option<bool>,
    pub dark_mode_forced: Option<bool>,
}

impl ThemePreference {
    pub fn new(use_system_setting: bool, dark_mode_forced: bool) -> Self {
        Self {
            use_system_setting,
            dark_mode_forced,
        }
    }

    /// Resolve whether dark mode is in effect given the system setting
    pub fn is_dark(&self, system_dark: bool) -> bool {
        if self.use_system_setting {
            system_dark
        } else {
            self.dark_mode_forced
        }
    }

    /// Apply an update, returning false if it was refused
    ///
    /// The forced dark mode flag cannot change while the system setting is followed.
    pub fn apply(&mut self, update: ThemeUpdate) -> bool {
        let use_system_setting = update.use_system_setting.unwrap_or(self.use_system_setting);

        if let Some(dark) = update.dark_mode_forced {
            if use_system_setting && dark != self.dark_mode_forced {
                return false;
            }
            self.dark_mode_forced = dark;
        }
        self.use_system_setting = use_system_setting;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_setting_overrides_forced_flag() {
        let theme = ThemePreference::new(true, true);
        assert!(!theme.is_dark(false));
        assert!(theme.is_dark(true));

        let theme = ThemePreference::new(false, true);
        assert!(theme.is_dark(false));
    }

    #[test]
    fn forced_flag_is_locked_while_following_system() {
        let mut theme = ThemePreference::new(true, false);
        let accepted = theme.apply(ThemeUpdate {
            use_system_setting: None,
            dark_mode_forced: Some(true),
        });
        assert!(!accepted);
        assert_eq!(theme, ThemePreference::new(true, false));
    }

    #[test]
    fn leaving_system_setting_and_forcing_dark_in_one_update() {
        let mut theme = ThemePreference::new(true, false);
        assert!(theme.apply(ThemeUpdate {
            use_system_setting: Some(false),
            dark_mode_forced: Some(true),
        }));
        assert_eq!(theme, ThemePreference::new(false, true));
    }

    #[test]
    fn following_system_keeps_previous_forced_value() {
        let mut theme = ThemePreference::new(false, true);
        assert!(theme.apply(ThemeUpdate {
            use_system_setting: Some(true),
            dark_mode_forced: None,
        }));
        assert!(theme.dark_mode_forced);
        assert!(!theme.is_dark(false));
    }
}
