//! Time formatting and crew status labels.
//!
//! Universal time is a plain `f64` count of seconds, as the host reports it.
//! Day length depends on [`crate::settings::Settings::kerbin_time`].

use crate::constants::labels;
use crate::constants::time::{HOUR, MINUTE};

/// Break `seconds` into whole days, hours, minutes and remaining seconds.
fn split(seconds: f64, day_length: f64) -> (u64, u64, u64, u64) {
    let mut t = seconds.max(0.0);
    let days = (t / day_length).floor();
    t %= day_length;
    let hours = (t / HOUR).floor();
    t %= HOUR;
    let minutes = (t / MINUTE).floor();
    t %= MINUTE;
    (days as u64, hours as u64, minutes as u64, t.floor() as u64)
}

/// "3 days, 2 hours, 0 minutes, 5 seconds". Non-positive input yields all zeros.
pub fn format_duration(seconds: f64, day_length: f64) -> String {
    let (d, h, m, s) = split(seconds, day_length);
    format!("{} days, {} hours, {} minutes, {} seconds", d, h, m, s)
}

/// "03:02:00:05" (days:hours:minutes:seconds).
pub fn format_colon(seconds: f64, day_length: f64) -> String {
    let (d, h, m, s) = split(seconds, day_length);
    format!("{:02}:{:02}:{:02}:{:02}", d, h, m, s)
}

/// Countdown label shown next to a vacationing crew member.
pub fn ready_label(remaining: f64, day_length: f64) -> String {
    format!("{}{}", labels::READY_IN, format_duration(remaining, day_length))
}

/// Status line for a vacationing crew member under the given lock mode.
pub fn vacation_label(hard_lock: bool) -> &'static str {
    if hard_lock {
        labels::VACATION_HARD
    } else {
        labels::VACATION_SOFT
    }
}
