//! Display formatting for dashboard values.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Shown when a timestamp is absent.
pub const NOT_AVAILABLE: &str = "N/A";
/// Shown when a timestamp is present but cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";
/// Duration label for an episode still being recorded.
pub const IN_PROGRESS: &str = "En curso";

/// `3725.0` → `"1h 2m 5s"`, `125.0` → `"2m 5s"`, `45.0` → `"45s"`.
///
/// Expects `seconds >= 0`; negative input renders as zero.
pub fn format_uptime(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_fps(fps: f64) -> String {
    format!("{:.1}", fps)
}

pub fn format_duration(duration_seconds: Option<f64>) -> String {
    match duration_seconds {
        Some(d) => format!("{:.1}s", d),
        None => IN_PROGRESS.to_string(),
    }
}

/// Render a backend timestamp in Spanish (Spain) local form, e.g.
/// `"15/1/2024, 10:30:00"`.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_timestamp(raw) {
        Some(local) => format_es_es(&local),
        None => INVALID_DATE.to_string(),
    }
}

pub fn format_es_es<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!(
        "{}/{}/{}, {}:{:02}:{:02}",
        dt.day(),
        dt.month(),
        dt.year(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

/// Accepts RFC 3339, naive ISO date-times (local time, as the backend emits
/// them) and bare dates (UTC midnight).
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0.0), "0s");
        assert_eq!(format_uptime(45.0), "45s");
        assert_eq!(format_uptime(125.0), "2m 5s");
        assert_eq!(format_uptime(3725.0), "1h 2m 5s");
        assert_eq!(format_uptime(3600.9), "1h 0m 0s");
        assert_eq!(format_uptime(59.99), "59s");
    }

    #[test]
    fn test_format_uptime_days_stay_in_hours() {
        assert_eq!(format_uptime(90_061.0), "25h 1m 1s");
    }

    #[test]
    fn test_format_date_absent() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
    }

    #[test]
    fn test_format_date_naive_is_local() {
        assert_eq!(format_date(Some("2024-01-15T10:30:00")), "15/1/2024, 10:30:00");
        assert_eq!(
            format_date(Some("2024-01-15T10:30:00.123456")),
            "15/1/2024, 10:30:00"
        );
    }

    #[test]
    fn test_format_date_malformed() {
        assert_eq!(format_date(Some("yesterday-ish")), INVALID_DATE);
    }

    #[test]
    fn test_format_es_es() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let dt = tz.with_ymd_and_hms(2024, 3, 5, 9, 3, 7).unwrap();
        assert_eq!(format_es_es(&dt), "5/3/2024, 9:03:07");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(12.34)), "12.3s");
        assert_eq!(format_duration(None), "En curso");
    }

    #[test]
    fn test_format_fps() {
        assert_eq!(format_fps(14.96), "15.0");
        assert_eq!(format_fps(0.0), "0.0");
    }
}
