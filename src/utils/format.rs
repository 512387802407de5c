//! Time formatting helpers shared by the engine, the notifications and the API

use std::time::Duration;

/// Number of digit positions in an `HHMMSS` entry
pub const MAX_DIGITS: usize = 6;

/// Place values of the digit positions, starting from the rightmost digit
const PLACE_SECONDS: [u64; MAX_DIGITS] = [1, 10, 60, 600, 3600, 36000];

/// Render a number of seconds as `HH:MM:SS`
///
/// Hours are not capped, so 100 hours and more render with a wider hour field.
pub fn seconds_to_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Convert right-aligned `HHMMSS` digits into a total number of seconds
pub fn digits_to_seconds(digits: &[u8]) -> u64 {
    digits
        .iter()
        .rev()
        .zip(PLACE_SECONDS.iter())
        .map(|(&digit, &place)| u64::from(digit) * place)
        .sum()
}

/// Render entered digits as `"HHh MMm SSs"`, left-padding with zeros
pub fn digits_to_display(digits: &[u8]) -> String {
    let joined: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    let padded = format!("{:0>width$}", joined, width = MAX_DIGITS);

    format!("{}h {}m {}s", &padded[0..2], &padded[2..4], &padded[4..6])
}

/// Format an uptime as a short human readable string
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
