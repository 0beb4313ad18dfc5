//! Duration parsing and formatting.
//!
//! Input accepts the shorthand people type on the command line
//! (`90`, `1.5h`, `1h30m`, `90m`); output is a compact `Xh Ym` label.

use std::sync::LazyLock;

use regex::Regex;

use crate::ValidationError;

/// `<hours>h<minutes>` with an optional trailing `m`.
static HOURS_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*h\s*(\d+)\s*m?$").unwrap());

/// `<minutes>m`.
static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s*m$").unwrap());

/// Parse a duration string into whole minutes.
///
/// Rules are tried in order and the first match wins:
/// 1. a bare integer is minutes: `"90"`
/// 2. a number followed by `h` is (possibly fractional) hours, truncated: `"1.5h"`
/// 3. hours and minutes: `"1h30m"`, `"1h30"`
/// 4. minutes with a suffix: `"90m"`
pub fn parse_duration(input: &str) -> Result<u32, ValidationError> {
    let s = input.trim();
    let invalid = || ValidationError::InvalidDuration {
        input: input.to_string(),
    };

    if let Ok(minutes) = s.parse::<u32>() {
        return Ok(minutes);
    }

    if let Some(hours) = s.strip_suffix('h') {
        if let Some(minutes) = fractional_hours_to_minutes(hours.trim_end()) {
            return Ok(minutes);
        }
    }

    if let Some(caps) = HOURS_MINUTES_RE.captures(s) {
        let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;
        return hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(invalid);
    }

    if let Some(caps) = MINUTES_RE.captures(s) {
        return caps[1].parse().map_err(|_| invalid());
    }

    Err(invalid())
}

/// Converts `"1.5"` (hours) to 90, truncating toward zero.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn fractional_hours_to_minutes(hours: &str) -> Option<u32> {
    // `f64::from_str` also accepts "inf" and "nan"; only plain numbers are durations
    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let hours: f64 = hours.parse().ok()?;
    let minutes = (hours * 60.0).trunc();
    if minutes > f64::from(u32::MAX) {
        return None;
    }
    Some(minutes as u32)
}

/// Formats minutes as a human-readable label.
///
/// Returns "Xh Ym" when both parts are non-zero, "Xh" for whole hours and
/// "Ym" below one hour (including "0m").
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
