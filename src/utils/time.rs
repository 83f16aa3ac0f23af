//! Time parsing and formatting utilities

use std::time::Duration;

/// Parse an engine clock `HH:MM:SS.ms` into seconds.
///
/// Negative or malformed clocks (ffmpeg prints `N/A` or a negative value
/// before the first frame) yield `None`.
pub fn parse_timestamp(text: &str) -> Option<f64> {
    let mut parts = text.trim().split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Format seconds as `M:SS`, or `H:MM:SS` past the hour
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Format a duration with milliseconds, e.g. `01:02.500`
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let milliseconds = duration.subsec_millis();

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:04.00"), Some(4.0));
        assert_eq!(parse_timestamp("01:02:03.50"), Some(3723.5));
        assert_eq!(parse_timestamp("00:01:00"), Some(60.0));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("N/A"), None);
        assert_eq!(parse_timestamp("-577014:32:22.77"), None);
        assert_eq!(parse_timestamp("00:61:00"), None);
        assert_eq!(parse_timestamp("12.5"), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(26.0), "0:26");
        assert_eq!(format_clock(125.9), "2:05");
        assert_eq!(format_clock(3725.0), "1:02:05");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(62_500)), "01:02.500");
        assert_eq!(
            format_duration(Duration::from_secs(3723)),
            "01:02:03.000"
        );
    }
}
