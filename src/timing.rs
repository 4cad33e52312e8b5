use chrono::{DateTime, Utc};

use crate::error::{RadarError, RadarResult};

/// Floor `now` (epoch seconds) to the start of the refresh window it falls
/// in. Every cache key in the pipeline derives from this value.
pub fn bucket_for(now: i64, delta: u64) -> i64 {
    now - now.rem_euclid(delta as i64)
}

/// Bucket for the current wall-clock time.
pub fn current_bucket(delta: u64) -> i64 {
    bucket_for(Utc::now().timestamp(), delta)
}

/// Seconds until the next bucket boundary; `delta` when exactly on one.
pub fn seconds_until_next(now: i64, delta: u64) -> u64 {
    (delta as i64 - now.rem_euclid(delta as i64)) as u64
}

/// Snapshot timestamps for the loop ending at `bucket`: `frames` entries
/// spaced `delta` seconds apart, oldest first, formatted as the upstream
/// `YYYYMMDDHHMM` UTC addressing scheme.
pub fn time_strings(bucket: i64, delta: u64, frames: usize) -> RadarResult<Vec<String>> {
    (0..frames)
        .rev()
        .map(|k| {
            let ts = bucket - delta as i64 * k as i64;
            let dt = DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
                RadarError::validation(format!("snapshot timestamp {ts} is out of range"))
            })?;
            Ok(dt.format("%Y%m%d%H%M").to_string())
        })
        .collect()
}
