use crate::application::interface::ClockTrait;
use crate::entity::datetime::{date_time_to_timestamp, is_time_slot_valid};
use crate::entity::selection_state::SelectionState;
use crate::entity::time_slot::generate_time_slots_for_date;
use chrono::NaiveDate;
use log::{debug, info, warn};

#[cfg(test)]
use crate::adapter::gateway::clock::FixedClock;

#[cfg(test)]
use chrono::{Duration, FixedOffset, TimeZone};

/// Owns the selection and the only transitions allowed on it.
///
/// Each operation replaces the whole `SelectionState`, so readers never see
/// a half-updated selection.
pub struct BookingStore<C: ClockTrait> {
    clock: C,
    state: SelectionState,
}

impl<C: ClockTrait> BookingStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: SelectionState::default(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        let now = self.clock.now();
        let time_slots = generate_time_slots_for_date(date, &now);

        // 選択済みの時刻が新しい日付でも選べるか確認する
        let selected_time = match self.state.get_selected_time() {
            Some(minutes) if !is_time_slot_valid(date, minutes, &now) => {
                debug!("clearing selected time {} for {}", minutes, date);
                None
            }
            other => other,
        };

        self.state = SelectionState::new(Some(date), selected_time, time_slots);
        debug!("selected date {}", date);
    }

    // 選択可能な枠かどうかは呼び出し側(UI)を信頼する
    pub fn select_time(&mut self, minutes: u32) {
        let is_enabled_slot = self
            .state
            .get_available_time_slots()
            .iter()
            .any(|slot| slot.get_value() == minutes && !slot.is_disabled());
        if !is_enabled_slot {
            warn!("selected time {} is not an enabled slot", minutes);
        }

        let selected_date = self.state.get_selected_date();
        let time_slots = std::mem::take(&mut self.state).into_time_slots();

        self.state = SelectionState::new(selected_date, Some(minutes), time_slots);
        debug!("selected time {}", minutes);
    }

    /// Returns the booked instant in epoch seconds and clears the selection,
    /// or `None` without touching anything when date or time is missing or
    /// the instant cannot be represented.
    pub fn confirm_booking(&mut self) -> Option<i64> {
        let date = self.state.get_selected_date()?;
        let minutes = self.state.get_selected_time()?;

        let tz = self.clock.now().timezone();
        let timestamp = match date_time_to_timestamp(&tz, date, minutes) {
            Some(timestamp) => timestamp,
            None => {
                warn!("cannot convert {} {} to a timestamp", date, minutes);
                return None;
            }
        };
        info!("booking confirmed: timestamp={}", timestamp);

        self.state = SelectionState::default();

        Some(timestamp)
    }

    pub fn reset_selection(&mut self) {
        self.state = SelectionState::default();
        debug!("selection reset");
    }
}

#[cfg(test)]
fn store_at(h: u32, m: u32) -> BookingStore<FixedClock<FixedOffset>> {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap();

    BookingStore::new(FixedClock::new(now))
}

#[cfg(test)]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

#[cfg(test)]
fn future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

// 不変条件: 枠は日付が選ばれている時だけ存在し、確定可能は日付と時刻が揃った時だけ
#[cfg(test)]
fn assert_invariants<C: ClockTrait>(store: &BookingStore<C>) {
    let state = store.state();

    assert_eq!(
        state.get_available_time_slots().is_empty(),
        state.get_selected_date().is_none()
    );
    assert_eq!(
        state.is_confirm_enabled(),
        state.get_selected_date().is_some() && state.get_selected_time().is_some()
    );
}

#[test]
fn test_select_date_枠を作り直すこと() {
    let mut store = store_at(9, 7);

    store.select_date(today());
    assert_invariants(&store);
    assert_eq!(store.state().get_selected_date(), Some(today()));
    assert_eq!(store.state().get_available_time_slots().len(), 96);
    assert!(store.state().get_available_time_slots()[36].is_disabled());

    store.select_date(future_date());
    assert_invariants(&store);
    assert!(store
        .state()
        .get_available_time_slots()
        .iter()
        .all(|slot| !slot.is_disabled()));
}

#[test]
fn test_select_date_時刻が未選択なら確定できない() {
    let mut store = store_at(9, 7);

    store.select_date(future_date());

    assert_eq!(store.state().get_selected_time(), None);
    assert!(!store.state().is_confirm_enabled());
}

#[test]
fn test_select_time_日付がある時だけ確定可能になること() {
    let mut store = store_at(9, 7);

    store.select_time(600);
    assert!(!store.state().is_confirm_enabled());
    assert_eq!(store.state().get_selected_time(), Some(600));

    store.select_date(future_date());
    assert!(store.state().is_confirm_enabled());
    assert_invariants(&store);
}

#[test]
fn test_select_time_無効な枠でも記録はされること() {
    let mut store = store_at(9, 7);

    store.select_date(today());
    store.select_time(0);

    assert_eq!(store.state().get_selected_time(), Some(0));
    assert!(store.state().is_confirm_enabled());
    assert_eq!(store.state().get_available_time_slots().len(), 96);
}

#[test]
fn test_select_date_未来の日付から今日に戻すと過去の時刻は解除されること() {
    let mut store = store_at(9, 7);

    store.select_date(future_date());
    store.select_time(480);
    assert!(store.state().is_confirm_enabled());

    store.select_date(today());
    assert_eq!(store.state().get_selected_time(), None);
    assert!(!store.state().is_confirm_enabled());
    assert_invariants(&store);
}

#[test]
fn test_select_date_未来の時刻は日付を変えても保持されること() {
    let mut store = store_at(9, 7);

    store.select_date(future_date());
    store.select_time(600);
    store.select_date(today());

    assert_eq!(store.state().get_selected_time(), Some(600));
    assert!(store.state().is_confirm_enabled());
}

#[test]
fn test_select_date_2時間後に同じ日付を選び直すと時刻が解除されること() {
    let mut store = store_at(7, 30);

    store.select_date(today());
    store.select_time(480);
    assert!(store.state().is_confirm_enabled());

    store.clock_mut().advance(Duration::hours(2));
    store.select_date(today());

    assert_eq!(store.state().get_selected_time(), None);
    assert!(!store.state().is_confirm_enabled());
    assert_invariants(&store);
}

#[test]
fn test_confirm_booking_タイムスタンプを返して状態を空にすること() {
    let mut store = store_at(9, 7);

    store.select_date(today());
    store.select_time(555);
    let actual = store.confirm_booking();

    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    assert_eq!(actual, date_time_to_timestamp(&tz, today(), 555));
    assert_eq!(actual, Some(1709996400 + 555 * 60));
    assert!(store.state().is_empty());
    assert!(!store.state().is_confirm_enabled());
}

#[test]
fn test_confirm_booking_時刻が未選択なら何もしないこと() {
    let mut store = store_at(9, 7);

    store.select_date(today());
    store.select_date(future_date());
    let before = store.state().clone();

    assert_eq!(store.confirm_booking(), None);
    assert_eq!(store.state(), &before);
}

#[test]
fn test_confirm_booking_日付が未選択なら何もしないこと() {
    let mut store = store_at(9, 7);

    store.select_time(600);
    let before = store.state().clone();

    assert_eq!(store.confirm_booking(), None);
    assert_eq!(store.state(), &before);
}

#[test]
fn test_confirm_booking_暦の端の日付でもパニックせず状態を保つこと() {
    let mut store = store_at(9, 7);

    store.select_date(NaiveDate::MIN);
    store.select_time(0);
    let before = store.state().clone();
    assert_eq!(store.confirm_booking(), None);
    assert_eq!(store.state(), &before);

    store.select_date(NaiveDate::MAX);
    store.select_time(1440);
    let before = store.state().clone();
    assert_eq!(store.confirm_booking(), None);
    assert_eq!(store.state(), &before);
    assert!(store.state().is_confirm_enabled());
}

#[test]
fn test_reset_selection_全て初期状態に戻すこと() {
    let mut store = store_at(9, 7);

    store.select_date(future_date());
    store.select_time(600);
    store.reset_selection();

    assert!(store.state().is_empty());
    assert_invariants(&store);
}

#[test]
fn test_new_ストアは互いに独立していること() {
    let mut a = store_at(9, 7);
    let b = store_at(9, 7);

    a.select_date(future_date());

    assert!(!a.state().is_empty());
    assert!(b.state().is_empty());
}
