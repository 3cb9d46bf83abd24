//! Month/year parsing for ordering projects.
//!
//! Only "March 2022"-style dates are understood. Empty, "current" and anything
//! unparseable all collapse to `now`, so a malformed start date sorts exactly like
//! an ongoing project. That ambiguity is accepted: one dirty date never fails a fill.
//!
//! The value is matched as given. Leading or trailing whitespace makes it
//! unparseable (" March 2022" sorts as `now`). Month abbreviations ("Mar 2022")
//! are accepted because chrono's `%B` takes both forms.

use chrono::{NaiveDate, NaiveDateTime};

/// Keyword marking an ongoing engagement.
const CURRENT: &str = "current";

/// Parses `raw` into a sortable point in time, falling back to `now`.
///
/// `now` is supplied by the caller so every fallback inside one fill compares equal.
pub fn parse_sort_date(raw: &str, now: NaiveDateTime) -> NaiveDateTime {
    if raw.is_empty() || raw.eq_ignore_ascii_case(CURRENT) {
        return now;
    }
    parse_month_year(raw)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}

/// "March 2022" → 2022-03-01. chrono needs a day, so the first of the month is implied.
fn parse_month_year(value: &str) -> Option<NaiveDate> {
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("1 {value}"), "%d %B %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_month_year_parses_to_first_of_month() {
        assert_eq!(parse_sort_date("March 2022", now()), ymd(2022, 3, 1));
        assert_eq!(parse_sort_date("December 1999", now()), ymd(1999, 12, 1));
    }

    #[test]
    fn test_month_name_is_case_insensitive() {
        assert_eq!(parse_sort_date("january 2023", now()), ymd(2023, 1, 1));
    }

    #[test]
    fn test_empty_is_now() {
        assert_eq!(parse_sort_date("", now()), now());
        assert_eq!(parse_sort_date("   ", now()), now());
    }

    #[test]
    fn test_current_any_case_is_now() {
        assert_eq!(parse_sort_date("current", now()), now());
        assert_eq!(parse_sort_date("Current", now()), now());
        assert_eq!(parse_sort_date("CURRENT", now()), now());
    }

    #[test]
    fn test_malformed_falls_back_to_now() {
        assert_eq!(parse_sort_date("2022-03", now()), now());
        assert_eq!(parse_sort_date("Q3 2021", now()), now());
        assert_eq!(parse_sort_date("Smarch 2020", now()), now());
        assert_eq!(parse_sort_date("March", now()), now());
    }

    #[test]
    fn test_surrounding_whitespace_falls_back_to_now() {
        assert_eq!(parse_sort_date(" March 2022", now()), now());
        assert_eq!(parse_sort_date("March 2022 ", now()), now());
        assert_eq!(parse_sort_date(" current", now()), now());
    }

    #[test]
    fn test_month_abbreviation_is_accepted() {
        assert_eq!(parse_sort_date("Mar 2022", now()), ymd(2022, 3, 1));
    }

    #[test]
    fn test_parsed_dates_order_chronologically() {
        let earlier = parse_sort_date("June 2019", now());
        let later = parse_sort_date("February 2021", now());
        assert!(earlier < later);
        assert!(later < parse_sort_date("current", now()));
    }
}
