// Aligned refresh-time calculation
//
// The display reloads once per hour at a fixed minute offset. This module
// computes the next aligned wall-clock instant strictly after a captured
// reference instant and derives the timer delay from it.

use crate::errors::RefreshError;
use chrono::{DateTime, Duration, TimeZone, Timelike};
use std::fmt;

/// Minute-of-hour boundary the display refreshes on
pub const REFRESH_MINUTE: u32 = 10;

/// Compute the next refresh instant for the given reference instant.
///
/// The candidate is the reference truncated to minute :10 with zeroed
/// seconds and sub-seconds, advanced one hour. If the candidate does not
/// land strictly after the reference it is advanced one more hour; with
/// plain duration arithmetic that branch is nearly unreachable, but it
/// guards unusual clock semantics such as a repeated DST hour.
pub fn next_refresh_at<Tz: TimeZone>(reference: &DateTime<Tz>) -> Result<DateTime<Tz>, RefreshError> {
    let aligned = reference
        .with_minute(REFRESH_MINUTE)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or(RefreshError::UnrepresentableTarget)?;

    let mut target = aligned + Duration::hours(1);
    if target <= *reference {
        target = target + Duration::hours(1);
    }

    Ok(target)
}

/// Elapsed delay between the reference and its refresh target.
///
/// A non-positive delay cannot arise from `next_refresh_at` and is
/// reported as an error rather than handed to the timer.
pub fn refresh_delay<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    target: &DateTime<Tz>,
) -> Result<Duration, RefreshError> {
    let delay = target.clone().signed_duration_since(reference.clone());
    if delay <= Duration::zero() {
        return Err(RefreshError::NonPositiveDelay {
            delay_ms: delay.num_milliseconds(),
        });
    }
    Ok(delay)
}

/// Human-readable diagnostic for an armed refresh
pub fn describe_refresh<Tz: TimeZone>(delay: Duration, target: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "Page will refresh in {} seconds at {}",
        delay.num_milliseconds() as f64 / 1000.0,
        target.format("%H:%M:%S")
    )
}
