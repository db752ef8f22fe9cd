use crate::entity::datetime::{get_current_time_rounded_up, is_today, MINUTES_PER_DAY, SLOT_MINUTES};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

#[cfg(test)]
use chrono::FixedOffset;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    label: String,
    // 0時からの経過分
    value: u32,
    disabled: bool,
}

impl TimeSlot {
    pub fn new(label: String, value: u32, disabled: bool) -> Self {
        Self {
            label,
            value,
            disabled,
        }
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn get_value(&self) -> u32 {
        self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

// "9:00 AM"の形式
pub fn format_slot_label(minutes: u32) -> String {
    let time = NaiveTime::from_num_seconds_from_midnight_opt((minutes % MINUTES_PER_DAY) * 60, 0)
        .unwrap_or(NaiveTime::MIN);

    time.format("%-I:%M %p").to_string()
}

/// All 96 slots of a day (00:00 through 23:45), none disabled.
pub fn generate_all_time_slots() -> Vec<TimeSlot> {
    (0..MINUTES_PER_DAY)
        .step_by(SLOT_MINUTES as usize)
        .map(|minutes| TimeSlot::new(format_slot_label(minutes), minutes, false))
        .collect()
}

/// Slots for `date`. When `date` is today, slots that start before the
/// current time (rounded up to the next slot) are disabled.
pub fn generate_time_slots_for_date<Tz: TimeZone>(
    date: NaiveDate,
    now: &DateTime<Tz>,
) -> Vec<TimeSlot> {
    let all_slots = generate_all_time_slots();

    if !is_today(date, now) {
        return all_slots;
    }

    let current_minutes = get_current_time_rounded_up(now);

    all_slots
        .into_iter()
        .map(|slot| TimeSlot {
            disabled: slot.value < current_minutes,
            ..slot
        })
        .collect()
}

#[cfg(test)]
fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[test]
fn test_generate_all_time_slots_96枠が昇順で並ぶこと() {
    let actual = generate_all_time_slots();

    assert_eq!(actual.len(), 96);
    for (k, slot) in actual.iter().enumerate() {
        assert_eq!(slot.get_value(), k as u32 * 15);
        assert!(!slot.is_disabled());
    }
}

#[test]
fn test_generate_all_time_slots_12時間表記のラベル() {
    let actual = generate_all_time_slots();

    assert_eq!(actual[0].get_label(), "12:00 AM");
    assert_eq!(actual[36].get_label(), "9:00 AM");
    assert_eq!(actual[37].get_label(), "9:15 AM");
    assert_eq!(actual[48].get_label(), "12:00 PM");
    assert_eq!(actual[95].get_label(), "11:45 PM");
}

#[test]
fn test_generate_time_slots_for_date_未来の日付は全て選択可能() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap();
    let future = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let actual = generate_time_slots_for_date(future, &now);

    assert_eq!(actual.len(), 96);
    assert!(actual.iter().all(|slot| !slot.is_disabled()));
}

#[test]
fn test_generate_time_slots_for_date_今日は過去の枠が無効になること() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let actual = generate_time_slots_for_date(now.date_naive(), &now);

    assert_eq!(actual.len(), 96);
    assert!(actual[36].is_disabled()); // 9:00 AM
    assert!(!actual[37].is_disabled()); // 9:15 AM

    let enabled = actual.iter().filter(|slot| !slot.is_disabled()).count();
    assert_eq!(enabled, 96 - 555 / 15);

    for (k, slot) in actual.iter().enumerate() {
        assert_eq!(slot.is_disabled(), (k as u32) * 15 < 555);
    }
}

#[test]
fn test_generate_time_slots_for_date_今日の深夜は全て無効() {
    let now = jst().with_ymd_and_hms(2024, 3, 10, 23, 46, 0).unwrap();
    let actual = generate_time_slots_for_date(now.date_naive(), &now);

    assert!(actual.iter().all(|slot| slot.is_disabled()));
}
