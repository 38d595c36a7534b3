use std::time::{SystemTime, UNIX_EPOCH};

/// Convert fractional seconds to wire microseconds.
///
/// The value is rounded to the nearest microsecond; negative inputs
/// clamp to zero (the epoch).
pub fn to_micros(seconds: f64) -> u64 {
    let micros = (seconds * 1_000_000.0).round();
    if micros.is_sign_negative() {
        0
    } else {
        micros as u64
    }
}

/// Convert wire microseconds back to fractional seconds.
pub fn to_seconds(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Current time as wire microseconds, computed at the moment of the
/// call.
pub(crate) fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}
