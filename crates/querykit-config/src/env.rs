//! Typed environment variable getters.
//!
//! Each getter returns the fallback when the variable is unset or cannot be
//! parsed; none of them fail.

use std::env;
use std::time::Duration;
use time::Date;
use time::macros::format_description;

/// Load variables from a `.env` file in the working directory or its
/// parents. A missing file is not an error. Returns the loaded path.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load .env file");
            None
        }
    }
}

pub fn get_string(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Read a duration such as `90s`, `15m` or `1h 30m`. An unparsable value
/// logs a warning.
pub fn get_duration(key: &str, fallback: Duration) -> Duration {
    let Ok(value) = env::var(key) else {
        return fallback;
    };
    match humantime::parse_duration(value.trim()) {
        Ok(duration) => duration,
        Err(e) => {
            tracing::warn!(
                key = %key,
                value = %value,
                error = %e,
                "incorrect duration value, using fallback"
            );
            fallback
        }
    }
}

pub fn get_int(key: &str, fallback: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

/// Read a boolean. Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and their
/// false counterparts `0`, `f`, `F`, `false`, `FALSE`, `False`.
pub fn get_bool(key: &str, fallback: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(fallback)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Read a `YYYY-MM-DD` date.
pub fn get_date(key: &str, fallback: Date) -> Date {
    let format = format_description!("[year]-[month]-[day]");
    env::var(key)
        .ok()
        .and_then(|v| Date::parse(&v, format).ok())
        .unwrap_or(fallback)
}
