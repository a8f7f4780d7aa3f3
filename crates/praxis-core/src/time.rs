//! Day arithmetic on absolute timestamps.

use jiff::{SignedDuration, Timestamp};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Fractional days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: Timestamp, to: Timestamp) -> f64 {
    to.duration_since(from).as_secs_f64() / SECONDS_PER_DAY as f64
}

/// `ts` shifted by whole days, saturating at the representable range.
pub fn add_days(ts: Timestamp, days: i64) -> Timestamp {
    let duration = SignedDuration::from_secs(days.saturating_mul(SECONDS_PER_DAY));
    ts.checked_add(duration).unwrap_or(if days < 0 {
        Timestamp::MIN
    } else {
        Timestamp::MAX
    })
}
