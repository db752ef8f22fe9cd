use crate::entity::datetime::date_time_to_timestamp;
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt;

#[cfg(test)]
use chrono::FixedOffset;

#[cfg(test)]
use chrono_tz::America::New_York;

/// Human-readable form of a booked instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingSummary {
    // "Sunday, March 10, 2024"
    date: String,
    // "9:15 AM"
    time: String,
}

impl BookingSummary {
    pub fn new(date: String, time: String) -> Self {
        Self { date, time }
    }

    pub fn get_date(&self) -> &str {
        &self.date
    }

    pub fn get_time(&self) -> &str {
        &self.time
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.date, self.time)
    }
}

fn summarize_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> BookingSummary
where
    Tz::Offset: fmt::Display,
{
    BookingSummary::new(
        dt.format("%A, %B %-d, %Y").to_string(),
        dt.format("%-I:%M %p").to_string(),
    )
}

pub fn summarize_selection<Tz: TimeZone>(tz: &Tz, date: NaiveDate, minutes: u32) -> BookingSummary
where
    Tz::Offset: fmt::Display,
{
    match date_time_to_timestamp(tz, date, minutes).and_then(|ts| summarize_timestamp(tz, ts)) {
        Some(summary) => summary,
        None => BookingSummary::new(date.format("%A, %B %-d, %Y").to_string(), String::new()),
    }
}

// date_time_to_timestamp の逆変換。範囲外の場合はNone
pub fn summarize_timestamp<Tz: TimeZone>(tz: &Tz, timestamp: i64) -> Option<BookingSummary>
where
    Tz::Offset: fmt::Display,
{
    let dt = tz.timestamp_opt(timestamp, 0).single()?;

    Some(summarize_datetime(&dt))
}

#[test]
fn test_summarize_timestamp_日付と時刻を表示用に整形する() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let actual = summarize_timestamp(&tz, 1709996400 + 555 * 60).unwrap();

    assert_eq!(actual.get_date(), "Sunday, March 10, 2024");
    assert_eq!(actual.get_time(), "9:15 AM");
    assert_eq!(actual.to_string(), "Sunday, March 10, 2024 at 9:15 AM");
}

#[test]
fn test_summarize_timestamp_範囲外の場合はnone() {
    let tz = FixedOffset::east_opt(0).unwrap();

    assert_eq!(summarize_timestamp(&tz, i64::MAX), None);
}

#[test]
fn test_summarize_selection_タイムスタンプ経由と一致すること() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    for minutes in [0, 150, 555, 1425] {
        let timestamp = date_time_to_timestamp(&New_York, date, minutes).unwrap();
        assert_eq!(
            Some(summarize_selection(&New_York, date, minutes)),
            summarize_timestamp(&New_York, timestamp)
        );
    }
}

#[test]
fn test_summarize_selection_夏時間の空白時刻は1時間後として表示される() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let actual = summarize_selection(&New_York, date, 150);

    assert_eq!(actual.get_time(), "3:30 AM");
}

#[test]
fn test_summarize_selection_表現できない時刻は日付だけ返すこと() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let actual = summarize_selection(&tz, NaiveDate::MAX, 1440);

    assert_eq!(actual.get_date(), NaiveDate::MAX.format("%A, %B %-d, %Y").to_string());
    assert_eq!(actual.get_time(), "");
}

#[test]
fn test_summarize_selection_午後の表示() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let actual = summarize_selection(&tz, date, 13 * 60 + 45);

    assert_eq!(actual.get_date(), "Sunday, December 1, 2024");
    assert_eq!(actual.get_time(), "1:45 PM");
}
