/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a millisecond timestamp as a UTC calendar date (`DD.MM.YYYY`)
pub fn format_date_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%d.%m.%Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_millis() {
        // 2024-03-05T12:00:00Z
        assert_eq!(format_date_millis(1_709_640_000_000), "05.03.2024");
        assert_eq!(format_date_millis(0), "01.01.1970");
    }

    #[test]
    fn test_now_millis_is_recent() {
        assert!(now_millis() > 1_704_067_200_000);
    }
}
