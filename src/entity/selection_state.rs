use crate::entity::time_slot::TimeSlot;
use chrono::NaiveDate;

#[cfg(test)]
use crate::entity::time_slot::generate_all_time_slots;

/// Snapshot of the user's current selection.
///
/// `is_confirm_enabled` is derived on construction, so it is true exactly
/// when both a date and a time are present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_date: Option<NaiveDate>,
    // 0時からの経過分
    selected_time: Option<u32>,
    available_time_slots: Vec<TimeSlot>,
    is_confirm_enabled: bool,
}

impl SelectionState {
    pub fn new(
        selected_date: Option<NaiveDate>,
        selected_time: Option<u32>,
        available_time_slots: Vec<TimeSlot>,
    ) -> Self {
        Self {
            selected_date,
            selected_time,
            available_time_slots,
            is_confirm_enabled: selected_date.is_some() && selected_time.is_some(),
        }
    }

    pub fn get_selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn get_selected_time(&self) -> Option<u32> {
        self.selected_time
    }

    pub fn get_available_time_slots(&self) -> &[TimeSlot] {
        &self.available_time_slots
    }

    pub fn is_confirm_enabled(&self) -> bool {
        self.is_confirm_enabled
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn into_time_slots(self) -> Vec<TimeSlot> {
        self.available_time_slots
    }
}

#[test]
fn test_new_日付と時刻が揃った時だけ確定可能() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    assert!(!SelectionState::new(None, None, vec![]).is_confirm_enabled());
    assert!(!SelectionState::new(Some(date), None, generate_all_time_slots()).is_confirm_enabled());
    assert!(!SelectionState::new(None, Some(540), vec![]).is_confirm_enabled());
    assert!(SelectionState::new(Some(date), Some(540), generate_all_time_slots()).is_confirm_enabled());
}

#[test]
fn test_default_初期状態は空() {
    let actual = SelectionState::default();

    assert!(actual.is_empty());
    assert_eq!(actual.get_selected_date(), None);
    assert_eq!(actual.get_selected_time(), None);
    assert!(actual.get_available_time_slots().is_empty());
    assert!(!actual.is_confirm_enabled());
}
