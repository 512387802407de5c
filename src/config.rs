//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::{TargetDigits, ThemePreference};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(about = "A background countdown timer with an observable state API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Start a countdown at launch, entered as HHMMSS digits (e.g. 1500 for 15 minutes)
    #[arg(short, long, value_name = "DIGITS")]
    pub start: Option<TargetDigits>,

    /// Start the launch countdown paused
    #[arg(long, requires = "start")]
    pub paused: bool,

    /// Follow the system dark mode setting
    #[arg(long)]
    pub follow_system_theme: bool,

    /// Force dark mode (ignored when following the system setting)
    #[arg(long)]
    pub dark_mode: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial theme preference
    pub fn theme(&self) -> ThemePreference {
        ThemePreference::new(self.follow_system_theme, self.dark_mode)
    }
}
