//! Wall-clock time utilities.
//!
//! Pure conversions between local `DateTime`s, "HH:MM" time-of-day
//! tokens, and second counts. The engine derives remaining time from
//! an absolute end instant on every observation -- nothing in here
//! keeps state or decrements counters.

use chrono::{DateTime, Duration, Local, TimeZone};

use crate::error::{CoreError, Result};

/// Resolve an "HH:MM" token to today's wall-clock instant.
///
/// If that instant is already in the past relative to `now`, it rolls
/// forward by exactly one day.
///
/// # Errors
/// Returns `InvalidTimeToken` if the token cannot be split into two
/// integers by `:`, or if hours are outside 0..=23 or minutes outside
/// 0..=59.
pub fn time_of_day_to_instant(token: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
    let (hours, minutes) = split_token(token)?;

    let naive = now
        .date_naive()
        .and_hms_opt(hours, minutes, 0)
        .ok_or_else(|| CoreError::invalid_token(token, "not a valid time of day"))?;
    let instant = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| CoreError::invalid_token(token, "not a valid local time"))?;

    // Past times mean tomorrow.
    if instant < now {
        Ok(instant + Duration::days(1))
    } else {
        Ok(instant)
    }
}

/// Format an instant as a zero-padded 24-hour "HH:MM" local time.
pub fn instant_to_time_of_day(instant: DateTime<Local>) -> String {
    instant.format("%H:%M").to_string()
}

/// Whole seconds from `now` until `instant`, saturating at zero.
pub fn seconds_until(instant: DateTime<Local>, now: DateTime<Local>) -> u64 {
    (instant - now).num_seconds().max(0) as u64
}

/// Format a second count as zero-padded "MM:SS".
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn split_token(token: &str) -> Result<(u32, u32)> {
    let (h, m) = token
        .split_once(':')
        .ok_or_else(|| CoreError::invalid_token(token, "expected HH:MM"))?;
    let hours: u32 = h
        .parse()
        .map_err(|_| CoreError::invalid_token(token, "hours are not a number"))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| CoreError::invalid_token(token, "minutes are not a number"))?;
    if hours > 23 {
        return Err(CoreError::invalid_token(token, "hours out of range"));
    }
    if minutes > 59 {
        return Err(CoreError::invalid_token(token, "minutes out of range"));
    }
    Ok((hours, minutes))
}
