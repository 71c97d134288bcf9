use crate::data::DateValue;
use chrono::{Datelike, NaiveDate};

/// Fixed numeral table used by the compact display: index 0 is Sunday's
/// label, 1..=12 double as month numerals.
pub const NUMERALS: [&str; 13] = [
    "日", "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二",
];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1..=12) of `year`. Months outside the range
/// count as 30, matching the "otherwise" branch of the month table.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

/// Proleptic Gregorian day of week, 0 = Sunday. `None` for impossible dates.
pub fn weekday_of(year: i32, month: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.weekday().num_days_from_sunday())
}

/// Splits a `"Y-M-D"` string into integers. Empty, absent or malformed input
/// yields `current` instead of failing.
pub fn parse(input: Option<&str>, current: (i32, u32, u32)) -> (i32, u32, u32) {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return current;
    };
    raw.parse::<DateValue>()
        .map(|date| date.triple())
        .unwrap_or(current)
}

/// Composes `"Y-M-D"` without zero padding.
pub fn format(year: i32, month: u32, day: u32) -> String {
    format!("{}-{}-{}", year, month, day)
}

/// True for dates chrono can represent, so the weekday is always known.
pub fn is_valid(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Moves a `(year, month)` cursor by `months`, wrapping across years.
/// `None` past the representable range.
pub fn add_months(year: i32, month: u32, months: i32) -> Option<(i32, u32)> {
    let total = (month as i32 - 1).checked_add(months)?;
    let new_month = (total.rem_euclid(12) + 1) as u32;
    let new_year = year.checked_add(total.div_euclid(12))?;
    is_valid(new_year, new_month, 1).then_some((new_year, new_month))
}

/// Rows needed to lay out a month in a seven-column grid.
pub fn grid_rows(year: i32, month: u32) -> u32 {
    let start = weekday_of(year, month, 1).unwrap_or(0);
    (start + days_in_month(year, month)).div_ceil(7)
}

/// Lays out a month as rows of seven cells; leading cells before the first
/// weekday and trailing cells past the last day are `None`.
pub fn month_layout(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let start = weekday_of(year, month, 1).unwrap_or(0);
    let end = days_in_month(year, month);
    let mut day = 0u32;
    (0..grid_rows(year, month))
        .map(|row| {
            let mut cells = [None; 7];
            for (col, cell) in cells.iter_mut().enumerate() {
                if (row == 0 && (col as u32) < start) || day >= end {
                    continue;
                }
                day += 1;
                *cell = Some(day);
            }
            cells
        })
        .collect()
}

pub fn numeral(n: u32) -> &'static str {
    NUMERALS.get(n as usize).copied().unwrap_or("")
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_leap_year_known_values() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month_matches_gregorian_1900_2100() {
        for year in 1900..=2100 {
            for month in 1..=12u32 {
                let days = days_in_month(year, month);
                assert!((28..=31).contains(&days));
                // The first of the following month minus one day is the last day.
                let (ny, nm) = add_months(year, month, 1).unwrap();
                let last = NaiveDate::from_ymd_opt(ny, nm, 1)
                    .unwrap()
                    .pred_opt()
                    .unwrap();
                assert_eq!(days, last.day(), "{}-{}", year, month);
            }
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_weekday_of_known_dates() {
        assert_eq!(weekday_of(2024, 1, 1), Some(1)); // Monday
        assert_eq!(weekday_of(2024, 2, 29), Some(4)); // Thursday
        assert_eq!(weekday_of(2000, 1, 1), Some(6)); // Saturday
        assert_eq!(weekday_of(2023, 2, 29), None);
    }

    #[test]
    fn test_parse_valid_input() {
        assert_eq!(parse(Some("2024-2-29"), (1, 1, 1)), (2024, 2, 29));
        assert_eq!(parse(Some("2024-02-09"), (1, 1, 1)), (2024, 2, 9));
        assert_eq!(parse(Some(" 2024 - 2 - 9 "), (1, 1, 1)), (2024, 2, 9));
    }

    #[test]
    fn test_parse_empty_returns_current() {
        assert_eq!(parse(None, (2025, 6, 15)), (2025, 6, 15));
        assert_eq!(parse(Some(""), (2025, 6, 15)), (2025, 6, 15));
        assert_eq!(parse(Some("   "), (2025, 6, 15)), (2025, 6, 15));
    }

    #[test]
    fn test_parse_malformed_returns_current() {
        assert_eq!(parse(Some("not a date"), (2025, 6, 15)), (2025, 6, 15));
        assert_eq!(parse(Some("2023-2-29"), (2025, 6, 15)), (2025, 6, 15));
        assert_eq!(parse(Some("2023-13-1"), (2025, 6, 15)), (2025, 6, 15));
        assert_eq!(parse(Some("2023-1-1-1"), (2025, 6, 15)), (2025, 6, 15));
    }

    #[test]
    fn test_parse_format_roundtrip_1900_2100() {
        let mut date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();
        while date <= last {
            let triple = (date.year(), date.month(), date.day());
            let text = format(triple.0, triple.1, triple.2);
            assert_eq!(parse(Some(&text), (0, 0, 0)), triple, "{}", text);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_is_valid_rejects_years_without_a_weekday() {
        assert!(is_valid(1, 1, 1));
        assert!(!is_valid(300_000, 1, 1));
        assert!(!is_valid(i32::MAX, 12, 1));
        assert_eq!(parse(Some("300000-1-1"), (2025, 6, 15)), (2025, 6, 15));
    }

    #[test]
    fn test_add_months_stops_at_range_edge() {
        let max = NaiveDate::MAX;
        assert_eq!(add_months(max.year(), 12, 1), None);
        assert_eq!(add_months(i32::MAX, 12, 1), None);
        assert_eq!(add_months(2024, 1, i32::MAX), None);
        assert_eq!(add_months(max.year(), 11, 1), Some((max.year(), 12)));
    }

    #[test]
    fn test_format_no_zero_padding() {
        assert_eq!(format(2024, 3, 5), "2024-3-5");
    }

    #[test]
    fn test_add_months_wraps_years() {
        assert_eq!(add_months(2024, 12, 1), Some((2025, 1)));
        assert_eq!(add_months(2024, 1, -1), Some((2023, 12)));
        assert_eq!(add_months(2024, 6, 18), Some((2025, 12)));
        assert_eq!(add_months(2024, 6, -18), Some((2022, 12)));
    }

    #[test]
    fn test_grid_rows() {
        // Feb 2015 starts on Sunday and has 28 days: exactly four rows.
        assert_eq!(grid_rows(2015, 2), 4);
        // Feb 2024 starts on Thursday: 4 + 29 = 33 cells -> five rows.
        assert_eq!(grid_rows(2024, 2), 5);
        // Sep 2018 starts on Saturday with 30 days: six rows.
        assert_eq!(grid_rows(2018, 9), 6);
    }

    #[test]
    fn test_month_layout_leading_and_trailing_blanks() {
        let rows = month_layout(2024, 2);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], [None, None, None, None, Some(1), Some(2), Some(3)]);
        assert_eq!(rows[4][4], Some(29));
        assert_eq!(rows[4][5], None);
        let count = rows.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(count, 29);
    }

    #[test]
    fn test_numeral_table() {
        assert_eq!(numeral(0), "日");
        assert_eq!(numeral(2), "二");
        assert_eq!(numeral(12), "十二");
        assert_eq!(numeral(13), "");
    }

    #[test]
    fn test_month_name_known_values() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
    }
}
