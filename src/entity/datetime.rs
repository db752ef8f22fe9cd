use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

#[cfg(test)]
use chrono::FixedOffset;

#[cfg(test)]
use chrono_tz::America::New_York;

// 1枠の長さ(分)
pub const SLOT_MINUTES: u32 = 15;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// 今日から6週間後まで(両端を含む)
pub const BOOKING_WINDOW_DAYS: i64 = 6 * 7;

/// Calendar days offered for booking: today through today + 6 weeks, inclusive.
///
/// Days are stepped on the calendar, not by elapsed hours, so a DST
/// transition inside the window still yields exactly one entry per day.
pub fn generate_date_range<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<NaiveDate> {
    let today = now.date_naive();

    (0..=BOOKING_WINDOW_DAYS)
        .filter_map(|d| today.checked_add_signed(Duration::days(d)))
        .collect()
}

pub fn is_today<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> bool {
    date == now.date_naive()
}

/// Resolves a wall-clock time in `tz`.
///
/// Ambiguous times take the earliest instant. Times inside a DST gap are
/// read with the offset in force just before the gap. `None` when the
/// instant falls outside chrono's representable range.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Some(dt);
    }

    // 存在しない時刻(夏時間の開始)
    let before_gap = naive.checked_sub_signed(Duration::hours(1))?;
    let dt = tz.from_local_datetime(&before_gap).earliest()?;

    dt.checked_add_signed(Duration::hours(1))
}

pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Minutes since local midnight, rounded up to the next slot boundary.
///
/// 9:00 stays 540, 9:01 becomes 555. Seconds are ignored.
pub fn get_current_time_rounded_up<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    let current_minutes = now.hour() * 60 + now.minute();

    (current_minutes + SLOT_MINUTES - 1) / SLOT_MINUTES * SLOT_MINUTES
}

/// Epoch seconds of `date` at `minutes` past local midnight.
///
/// Values of 1440 or more roll over into the following days. `None` near
/// the ends of the calendar, where the instant cannot be represented.
pub fn date_time_to_timestamp<Tz: TimeZone>(tz: &Tz, date: NaiveDate, minutes: u32) -> Option<i64> {
    let hours = minutes / 60;
    let mins = minutes % 60;

    let naive = date
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::hours(hours as i64))?
        .checked_add_signed(Duration::minutes(mins as i64))?;

    resolve_local(tz, naive).map(|dt| dt.timestamp())
}

// 日付が変わった時に、選択済みの時刻がまだ選べるかを確認する
// 現在時刻は呼び出しのたびに評価される
pub fn is_time_slot_valid<Tz: TimeZone>(date: NaiveDate, minutes: u32, now: &DateTime<Tz>) -> bool {
    if !is_today(date, now) {
        return true;
    }

    minutes >= get_current_time_rounded_up(now)
}

#[cfg(test)]
fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[test]
fn test_generate_date_range_今日から42日後までの43日分を返すこと() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let actual = generate_date_range(&now);

    assert_eq!(actual.len(), 43);
    assert_eq!(actual[0], NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(actual[42], NaiveDate::from_ymd_opt(2024, 4, 21).unwrap());
}

#[test]
fn test_generate_date_range_深夜直前でも日付単位で生成されること() {
    let now = jst().with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let actual = generate_date_range(&now);

    assert_eq!(actual.len(), 43);
    assert_eq!(actual[0], NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    assert_eq!(actual[1], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
}

#[test]
fn test_generate_date_range_夏時間の切り替えを跨いでも1日1件であること() {
    let now = New_York.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let actual = generate_date_range(&now);

    assert_eq!(actual.len(), 43);
    for pair in actual.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(1));
    }
}

#[test]
fn test_get_current_time_rounded_up_15分単位に切り上げること() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    assert_eq!(get_current_time_rounded_up(&now), 555);

    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 1, 0).unwrap();
    assert_eq!(get_current_time_rounded_up(&now), 555);
}

#[test]
fn test_get_current_time_rounded_up_境界ちょうどの場合はそのまま() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 0, 45).unwrap();
    assert_eq!(get_current_time_rounded_up(&now), 540);

    let now = jst().with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    assert_eq!(get_current_time_rounded_up(&now), 0);
}

#[test]
fn test_get_current_time_rounded_up_23時46分以降は1440になること() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 23, 50, 0).unwrap();
    assert_eq!(get_current_time_rounded_up(&now), 1440);
}

#[test]
fn test_date_time_to_timestamp_0分は現地の0時() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let actual = date_time_to_timestamp(&jst(), date, 0);

    assert_eq!(actual, Some(1709996400));
    assert_eq!(actual, local_midnight(&jst(), date).map(|dt| dt.timestamp()));
}

#[test]
fn test_date_time_to_timestamp_1425分は0時から23時間45分後() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let actual = date_time_to_timestamp(&jst(), date, 1425);

    assert_eq!(actual, Some(1709996400 + (23 * 60 + 45) * 60));
}

#[test]
fn test_date_time_to_timestamp_1440分以上は翌日に繰り越すこと() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let next = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

    assert_eq!(
        date_time_to_timestamp(&jst(), date, 1440 + 60),
        date_time_to_timestamp(&jst(), next, 60)
    );
}

#[test]
fn test_date_time_to_timestamp_夏時間開始日の存在しない時刻() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    // 0:00 EST
    assert_eq!(date_time_to_timestamp(&New_York, date, 0), Some(1710046800));
    // 2:30は存在しないので3:30 EDTと同じ時点になる
    assert_eq!(date_time_to_timestamp(&New_York, date, 150), Some(1710055800));
    // 23:45 EDT
    assert_eq!(date_time_to_timestamp(&New_York, date, 1425), Some(1710128700));
}

#[test]
fn test_date_time_to_timestamp_夏時間終了日の重複する時刻は早い方() {
    let date = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();

    assert_eq!(date_time_to_timestamp(&New_York, date, 0), Some(1730606400));
    assert_eq!(date_time_to_timestamp(&New_York, date, 90), Some(1730611800));
}

#[test]
fn test_date_time_to_timestamp_暦の端ではnoneを返すこと() {
    // 0時(JST)はUTCに直すと表現できる範囲より前になる
    assert_eq!(date_time_to_timestamp(&jst(), NaiveDate::MIN, 0), None);
    assert_eq!(local_midnight(&jst(), NaiveDate::MIN), None);

    // 翌日に繰り越すと表現できない
    assert_eq!(date_time_to_timestamp(&jst(), NaiveDate::MAX, 1440), None);
    assert_eq!(date_time_to_timestamp(&jst(), NaiveDate::MAX, u32::MAX), None);
}

#[test]
fn test_generate_date_range_暦の終わりでは表現できる日付まで() {
    let now = jst().from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::MIN));
    let actual = generate_date_range(&now);

    assert_eq!(actual, vec![NaiveDate::MAX]);
}

#[test]
fn test_is_time_slot_valid_今日以外は常に有効() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 23, 0, 0).unwrap();
    let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

    assert!(is_time_slot_valid(tomorrow, 0, &now));
}

#[test]
fn test_is_time_slot_valid_今日は切り上げた現在時刻以降のみ有効() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let today = now.date_naive();

    assert!(!is_time_slot_valid(today, 540, &now));
    assert!(is_time_slot_valid(today, 555, &now));
}
