//! Shared utility functions for HCA crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Short day-and-month label used on chart axes, e.g. "05 Nov"
    pub fn format_day_month(date: &NaiveDate) -> String {
        date.format("%d %b").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" or "DD/MM/YYYY" form.
    /// Readings entered by hand tend to use the slash form.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if s.contains('/') {
            Ok(NaiveDate::parse_from_str(s, "%d/%m/%Y")?)
        } else {
            Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_date_both_forms() {
            let expected = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
            assert_eq!(parse_date("2024-11-05").unwrap(), expected);
            assert_eq!(parse_date("05/11/2024").unwrap(), expected);
            assert!(parse_date("november 5th").is_err());
        }

        #[test]
        fn test_format_and_parse_round_trip() {
            let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2025-01-15");
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }

        #[test]
        fn test_format_day_month() {
            let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
            assert_eq!(format_day_month(&date), "05 Nov");
        }
    }
}
