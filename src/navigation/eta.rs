use crate::HomeboundError;

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Formats a whole number of seconds as `HH:MM:S`.
///
/// Hours and minutes are zero-padded to two digits, the seconds remainder is
/// not padded at all, so 65 seconds renders as `00:01:5`.
pub fn format_eta_seconds(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let remainder = seconds % SECONDS_PER_MINUTE;

    format!("{:02}:{:02}:{}", hours, minutes, remainder)
}

/// Formats a route duration as reported by the directions service.
///
/// Durations are fractional. Hours and minutes are floored, the seconds
/// remainder is rounded to the nearest whole second, which means a remainder
/// of 59.5 or more renders as `60`.
///
/// # Errors
///
/// Returns [`HomeboundError::InvalidDuration`] for negative or non-finite input.
pub fn format_eta(duration_s: f64) -> Result<String, HomeboundError> {
    if !duration_s.is_finite() || duration_s < 0. {
        return Err(HomeboundError::InvalidDuration { value: duration_s });
    }

    let hours = (duration_s / SECONDS_PER_HOUR as f64).floor() as u64;
    let minutes = ((duration_s % SECONDS_PER_HOUR as f64) / SECONDS_PER_MINUTE as f64).floor() as u64;
    let remainder = (duration_s % SECONDS_PER_MINUTE as f64).round() as u64;

    Ok(format!("{:02}:{:02}:{}", hours, minutes, remainder))
}
