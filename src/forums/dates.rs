//! Forum timestamp parsing.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?:st|nd|rd|th)\s+([A-Za-z]+)\s+([0-9]{4}),\s+([0-9]{2}):([0-9]{2})")
        .expect("valid date pattern")
});

static TODAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Today,\s+([0-9]{2}):([0-9]{2})").expect("valid today pattern")
});

static YESTERDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Yesterday,\s+([0-9]{2}):([0-9]{2})").expect("valid yesterday pattern")
});

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .and_then(|i| u32::try_from(i + 1).ok())
}

fn time_of_day(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// Parse a post header date relative to `now`.
///
/// Recognizes `23rd March 2023, 09:14`, `Today, 09:14` and
/// `Yesterday, 09:14`, in that order. Anything else, including impossible
/// calendar dates, yields `None`.
#[must_use]
pub fn parse_post_date(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if let Some(caps) = FULL_DATE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        return Some(date.and_time(time_of_day(&caps[4], &caps[5])?));
    }

    if text.contains("Today,") {
        let caps = TODAY.captures(text)?;
        return Some(now.date().and_time(time_of_day(&caps[1], &caps[2])?));
    }

    if text.contains("Yesterday,") {
        let caps = YESTERDAY.captures(text)?;
        let date = now.date() - Duration::days(1);
        return Some(date.and_time(time_of_day(&caps[1], &caps[2])?));
    }

    None
}
