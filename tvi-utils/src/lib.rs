//! Shared calendar helpers for TVI crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD" (Sentinel Hub time-range format)
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Last day number of a month, leap-year aware.
    /// February has 29 days when the year is divisible by 4 but not by 100,
    /// unless also divisible by 400.
    pub fn last_day_of_month(year: i32, month: u32) -> u32 {
        match month {
            2 => {
                if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

}

/// The bi-weekly period calendar used for the yearly comparison series.
///
/// The growing-season window runs February 1 through July 31, split into
/// twelve buckets: the first half of each month (days 1-14) and the rest
/// of the month (day 15 to the month's last day).
pub mod periods {
    use crate::dates::last_day_of_month;
    use chrono::NaiveDate;

    /// Number of periods in one year of the comparison series.
    pub const PERIOD_COUNT: usize = 12;

    /// First month of the period calendar (February).
    pub const FIRST_MONTH: u32 = 2;

    /// Row labels for the periods table, in order.
    pub const PERIOD_LABELS: [&str; PERIOD_COUNT] = [
        "Feb 1-14", "Feb 15-28", "Mar 1-14", "Mar 15-31", "Apr 1-14", "Apr 15-30", "May 1-14",
        "May 15-31", "Jun 1-14", "Jun 15-30", "Jul 1-14", "Jul 15-31",
    ];

    /// Inclusive date bounds of period `index` in `year`.
    ///
    /// Even indices cover days 1-14 of a month, odd indices day 15 through
    /// the month's last day (Feb 29 included in leap years). Returns None
    /// for an out-of-range index.
    pub fn period_bounds(year: i32, index: usize) -> Option<(NaiveDate, NaiveDate)> {
        if index >= PERIOD_COUNT {
            return None;
        }
        let month = FIRST_MONTH + (index / 2) as u32;
        let (first_day, last_day) = if index % 2 == 0 {
            (1, 14)
        } else {
            (15, last_day_of_month(year, month))
        };
        let start = NaiveDate::from_ymd_opt(year, month, first_day)?;
        let end = NaiveDate::from_ymd_opt(year, month, last_day)?;
        Some((start, end))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_period_bounds_first_and_last() {
            let (start, end) = period_bounds(2023, 0).unwrap();
            assert_eq!(start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
            assert_eq!(end, NaiveDate::from_ymd_opt(2023, 2, 14).unwrap());

            let (start, end) = period_bounds(2023, 11).unwrap();
            assert_eq!(start, NaiveDate::from_ymd_opt(2023, 7, 15).unwrap());
            assert_eq!(end, NaiveDate::from_ymd_opt(2023, 7, 31).unwrap());
        }

        #[test]
        fn test_period_bounds_leap_february() {
            let (_, end) = period_bounds(2024, 1).unwrap();
            assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

            let (_, end) = period_bounds(2023, 1).unwrap();
            assert_eq!(end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        }

        #[test]
        fn test_period_bounds_out_of_range() {
            assert!(period_bounds(2023, 12).is_none());
        }

        #[test]
        fn test_labels_match_bounds() {
            assert_eq!(PERIOD_LABELS.len(), PERIOD_COUNT);
            // Apr 15-30: thirty-day month second half
            let (start, end) = period_bounds(2023, 5).unwrap();
            assert_eq!(start.format("%b %-d").to_string(), "Apr 15");
            assert_eq!(end.format("%-d").to_string(), "30");
        }
    }
}

/// Analysis seasons and their month-day windows.
pub mod season {
    use crate::dates::last_day_of_month;
    use chrono::NaiveDate;
    use std::fmt;
    use std::str::FromStr;

    /// A named analysis window within a calendar year, aligned with the
    /// pollen seasons the monitoring project reports against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Season {
        /// February 1 - March 31
        EarlySpring,
        /// April 1 - May 31
        MidSpring,
        /// June 1 - August 31
        LateSpring,
        /// January 1 - December 31
        Year,
    }

    /// Error for unrecognized season names.
    #[derive(Debug)]
    pub struct SeasonParseError(pub String);

    impl fmt::Display for SeasonParseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "unknown season '{}' (expected one of: early_spring, mid_spring, late_spring, year)",
                self.0
            )
        }
    }

    impl std::error::Error for SeasonParseError {}

    impl Season {
        /// (start month, end month) of the season window.
        pub fn month_window(&self) -> (u32, u32) {
            match self {
                Season::EarlySpring => (2, 3),
                Season::MidSpring => (4, 5),
                Season::LateSpring => (6, 8),
                Season::Year => (1, 12),
            }
        }

        /// Inclusive date bounds of the season in `year`.
        pub fn date_bounds(&self, year: i32) -> (NaiveDate, NaiveDate) {
            let (start_month, end_month) = self.month_window();
            let start = NaiveDate::from_ymd_opt(year, start_month, 1)
                .expect("season start is a fixed valid date");
            let end = NaiveDate::from_ymd_opt(year, end_month, last_day_of_month(year, end_month))
                .expect("season end is a fixed valid date");
            (start, end)
        }

        /// Name used on the command line and in output filenames.
        pub fn as_str(&self) -> &'static str {
            match self {
                Season::EarlySpring => "early_spring",
                Season::MidSpring => "mid_spring",
                Season::LateSpring => "late_spring",
                Season::Year => "year",
            }
        }
    }

    impl FromStr for Season {
        type Err = SeasonParseError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "early_spring" => Ok(Season::EarlySpring),
                "mid_spring" => Ok(Season::MidSpring),
                "late_spring" => Ok(Season::LateSpring),
                "year" => Ok(Season::Year),
                other => Err(SeasonParseError(other.to_string())),
            }
        }
    }

}
