use chrono::{DateTime, Utc};

/// Placeholder for settings that were never filled in
pub const UNKNOWN: &str = "Unknown";

/// Timestamp fragment used in report file names
pub fn file_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d_%H%M%S").to_string()
}

/// Timestamp shown in report headers
pub fn display_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// The value itself, or `"Unknown"` when missing or blank
pub fn or_unknown(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamps() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_stamp(&ts), "20240309_070501");
        assert_eq!(display_stamp(&ts), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_or_unknown() {
        assert_eq!(or_unknown(Some("gpt-4o")), "gpt-4o");
        assert_eq!(or_unknown(Some(" ")), "Unknown");
        assert_eq!(or_unknown(None), "Unknown");
    }
}
