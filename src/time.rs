use hifitime::{Duration, Epoch};
use std::str::FromStr;

use crate::heliovis_errors::HeliovisError;

/// Parse an observation timestamp as found in calibrated image headers.
///
/// Accepts ISO-8601-like strings (`2011-06-07T06:33:02.770`), with or without
/// a trailing `Z`, and with a space instead of the `T` separator. Timestamps
/// without an explicit time scale are interpreted as UTC.
///
/// Argument
/// --------
/// * `raw`: the timestamp string taken from the header
///
/// Return
/// ------
/// * The parsed [`Epoch`], or `MalformedTimestamp` when the string does not
///   describe a date
pub fn parse_obs_timestamp(raw: &str) -> Result<Epoch, HeliovisError> {
    let mut normalized = raw.trim().trim_end_matches('Z').to_string();
    if !normalized.contains('T') {
        normalized = normalized.replacen(' ', "T", 1);
    }

    Epoch::from_str(&normalized).map_err(|_| HeliovisError::MalformedTimestamp(raw.to_string()))
}

/// Build `count` evenly spaced epochs covering `[start, stop]`, both ends included.
///
/// A `count` of one collapses to `start` alone. Used to build the sample grid
/// requested from the trajectory service.
pub fn epoch_linspace(start: Epoch, stop: Epoch, count: usize) -> Vec<Epoch> {
    if count <= 1 {
        return vec![start];
    }

    let total = (stop - start).to_seconds();
    (0..count)
        .map(|i| {
            let frac = i as f64 / (count - 1) as f64;
            start + Duration::from_seconds(total * frac)
        })
        .collect()
}
