use crate::entity::datetime::is_today;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

#[cfg(test)]
use crate::entity::datetime::generate_date_range;

#[cfg(test)]
use chrono::FixedOffset;

/// One selectable day as the date picker renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateInfo {
    date: NaiveDate,
    day_of_week: String,
    day_of_month: u32,
    month: String,
    is_today: bool,
    is_selected: bool,
}

impl DateInfo {
    pub fn get_date(&self) -> NaiveDate {
        self.date
    }

    pub fn get_day_of_week(&self) -> &str {
        &self.day_of_week
    }

    pub fn get_day_of_month(&self) -> u32 {
        self.day_of_month
    }

    pub fn get_month(&self) -> &str {
        &self.month
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }
}

// 選択状態や「今日」が変わるたびに作り直す
pub fn format_dates_for_ui<Tz: TimeZone>(
    dates: &[NaiveDate],
    selected_date: Option<NaiveDate>,
    now: &DateTime<Tz>,
) -> Vec<DateInfo> {
    dates
        .iter()
        .map(|&date| DateInfo {
            date,
            day_of_week: date.format("%a").to_string(),
            day_of_month: date.day(),
            month: date.format("%b").to_string(),
            is_today: is_today(date, now),
            is_selected: selected_date == Some(date),
        })
        .collect()
}

#[cfg(test)]
fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[test]
fn test_format_dates_for_ui_ラベルと日付() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let dates = generate_date_range(&now);
    let actual = format_dates_for_ui(&dates, None, &now);

    assert_eq!(actual.len(), 43);
    assert_eq!(actual[0].get_day_of_week(), "Sun");
    assert_eq!(actual[0].get_day_of_month(), 10);
    assert_eq!(actual[0].get_month(), "Mar");
    assert_eq!(actual[42].get_month(), "Apr");
}

#[test]
fn test_format_dates_for_ui_今日は先頭の1件だけ() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let dates = generate_date_range(&now);
    let actual = format_dates_for_ui(&dates, None, &now);

    assert!(actual[0].is_today());
    assert_eq!(actual.iter().filter(|info| info.is_today()).count(), 1);
}

#[test]
fn test_format_dates_for_ui_未選択の場合は全てfalse() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let dates = generate_date_range(&now);
    let actual = format_dates_for_ui(&dates, None, &now);

    assert!(actual.iter().all(|info| !info.is_selected()));
}

#[test]
fn test_format_dates_for_ui_選択中の日付だけtrue() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let dates = generate_date_range(&now);
    let selected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let actual = format_dates_for_ui(&dates, Some(selected), &now);

    let selected_infos: Vec<&DateInfo> = actual.iter().filter(|info| info.is_selected()).collect();
    assert_eq!(selected_infos.len(), 1);
    assert_eq!(selected_infos[0].get_date(), selected);
}

#[test]
fn test_format_dates_for_ui_日付を跨ぐと今日が移ること() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
    let dates = generate_date_range(&now);

    let later = jst().with_ymd_and_hms(2024, 3, 11, 0, 1, 0).unwrap();
    let actual = format_dates_for_ui(&dates, None, &later);

    assert!(!actual[0].is_today());
    assert!(actual[1].is_today());
}
