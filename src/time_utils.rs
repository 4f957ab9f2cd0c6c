use chrono::{DateTime, Months, Utc};

/// Timestamp (seconds) of the same calendar instant `years` earlier.
/// Month arithmetic clamps to the end of month, so Feb 29 maps to Feb 28.
pub fn years_before(timestamp: i64, years: u32) -> Option<i64> {
    let at = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    let months = years.checked_mul(12)?;
    at.checked_sub_months(Months::new(months))
        .map(|dt| dt.timestamp())
}

/// Midnight UTC of the day holding `timestamp`
pub fn start_of_day(timestamp: i64) -> Option<i64> {
    let at = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    Some(at.date_naive().and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

/// `%Y-%m-%d` rendering of a timestamp in seconds, for logs
pub fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_years_before_same_day() {
        let now = Utc.with_ymd_and_hms(2025, 7, 7, 0, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 7, 7, 0, 0, 0).unwrap();
        assert_eq!(years_before(now.timestamp(), 1), Some(expected.timestamp()));

        let expected = Utc.with_ymd_and_hms(2023, 7, 7, 0, 0, 0).unwrap();
        assert_eq!(years_before(now.timestamp(), 2), Some(expected.timestamp()));
    }

    #[test]
    fn test_years_before_leap_day() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 14, 30, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 2, 28, 14, 30, 0).unwrap();
        assert_eq!(years_before(now.timestamp(), 1), Some(expected.timestamp()));
    }

    #[test]
    fn test_years_before_zero_is_identity() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(years_before(now.timestamp(), 0), Some(now.timestamp()));
    }

    #[test]
    fn test_start_of_day() {
        let ts = Utc.with_ymd_and_hms(2022, 1, 10, 14, 30, 0).unwrap().timestamp();
        let expected = Utc.with_ymd_and_hms(2022, 1, 10, 0, 0, 0).unwrap().timestamp();
        assert_eq!(start_of_day(ts), Some(expected));
        assert_eq!(start_of_day(expected), Some(expected));
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2025, 7, 6, 10, 0, 0).unwrap().timestamp();
        assert_eq!(format_date(ts), "2025-07-06");
    }
}
