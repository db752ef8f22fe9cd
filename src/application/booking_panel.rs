use crate::application::booking_store::BookingStore;
use crate::application::interface::{BookingHandoffTrait, ClockTrait};
use crate::entity::booking_summary::{summarize_selection, BookingSummary};
use crate::entity::date_info::{format_dates_for_ui, DateInfo};
use crate::entity::datetime::generate_date_range;
use crate::entity::selection_state::SelectionState;
use crate::entity::time_slot::TimeSlot;
use crate::error::BookingError;
use chrono::{NaiveDate, TimeZone};
use log::{info, warn};
use std::fmt;

#[cfg(test)]
use crate::adapter::gateway::clock::FixedClock;

#[cfg(test)]
use chrono::{Duration, FixedOffset};

/// Wires picker events to a `BookingStore` and hands confirmed bookings on.
pub struct BookingPanel<C: ClockTrait> {
    store: BookingStore<C>,
    // 起動時に一度だけ計算する
    date_range: Vec<NaiveDate>,
}

impl<C: ClockTrait> BookingPanel<C>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    pub fn new(clock: C) -> Self {
        let date_range = generate_date_range(&clock.now());

        Self {
            store: BookingStore::new(clock),
            date_range,
        }
    }

    pub fn state(&self) -> &SelectionState {
        self.store.state()
    }

    pub fn clock(&self) -> &C {
        self.store.clock()
    }

    pub fn store_mut(&mut self) -> &mut BookingStore<C> {
        &mut self.store
    }

    pub fn date_range(&self) -> &[NaiveDate] {
        &self.date_range
    }

    pub fn date_choices(&self) -> Vec<DateInfo> {
        let now = self.store.clock().now();

        format_dates_for_ui(&self.date_range, self.state().get_selected_date(), &now)
    }

    pub fn time_choices(&self) -> &[TimeSlot] {
        self.state().get_available_time_slots()
    }

    /// Selects `date` unless it is already in the past.
    ///
    /// The date range is fixed at construction, so after midnight its first
    /// entry is yesterday. Such a date is refused and the selection is kept.
    pub fn handle_date_select(&mut self, date: NaiveDate) -> bool {
        let today = self.store.clock().now().date_naive();
        if date < today {
            warn!("refused past date {} (today is {})", date, today);
            return false;
        }

        self.store.select_date(date);
        true
    }

    pub fn handle_time_select(&mut self, minutes: u32) {
        self.store.select_time(minutes);
    }

    pub fn handle_reset(&mut self) {
        self.store.reset_selection();
    }

    // 「Your selection」欄。日付と時刻が揃っている時だけ表示する
    pub fn selection_summary(&self) -> Option<BookingSummary> {
        let date = self.state().get_selected_date()?;
        let minutes = self.state().get_selected_time()?;
        let tz = self.store.clock().now().timezone();

        Some(summarize_selection(&tz, date, minutes))
    }

    pub fn handle_confirm(
        &mut self,
        handoff: &mut dyn BookingHandoffTrait,
    ) -> Result<Option<i64>, BookingError> {
        match self.store.confirm_booking() {
            Some(timestamp) => {
                handoff.hand_off(timestamp)?;
                info!("handed off booking {}", timestamp);

                Ok(Some(timestamp))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
struct RecordingHandoff {
    timestamps: Vec<i64>,
}

#[cfg(test)]
impl BookingHandoffTrait for RecordingHandoff {
    fn hand_off(&mut self, timestamp: i64) -> Result<(), BookingError> {
        self.timestamps.push(timestamp);
        Ok(())
    }
}

#[cfg(test)]
fn panel_at(h: u32, m: u32) -> BookingPanel<FixedClock<FixedOffset>> {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();

    BookingPanel::new(FixedClock::new(tz.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()))
}

#[test]
fn test_date_choices_選択した日付が反映されること() {
    let mut panel = panel_at(9, 7);
    let date = panel.date_range()[3];

    assert!(panel.date_choices().iter().all(|info| !info.is_selected()));

    panel.handle_date_select(date);
    let choices = panel.date_choices();

    assert_eq!(choices.len(), 43);
    assert!(choices[3].is_selected());
    assert!(choices[0].is_today());
}

#[test]
fn test_date_choices_日付範囲は起動時のまま() {
    let mut panel = panel_at(23, 50);
    let first = panel.date_range()[0];

    panel.store_mut().clock_mut().advance(Duration::minutes(20));
    let choices = panel.date_choices();

    assert_eq!(choices[0].get_date(), first);
    assert!(!choices[0].is_today());
    assert!(choices[1].is_today());
}

#[test]
fn test_handle_date_select_日付を跨いだ後は前日を選べないこと() {
    let mut panel = panel_at(23, 50);
    let yesterday = panel.date_range()[0];
    let tomorrow = panel.date_range()[1];

    panel.store_mut().clock_mut().advance(Duration::minutes(20));

    assert!(!panel.handle_date_select(yesterday));
    assert!(panel.state().is_empty());

    assert!(panel.handle_date_select(tomorrow));
    panel.handle_time_select(600);
    assert!(!panel.handle_date_select(yesterday));
    assert_eq!(panel.state().get_selected_date(), Some(tomorrow));
    assert_eq!(panel.state().get_selected_time(), Some(600));
}

#[test]
fn test_selection_summary_揃っていない時はnone() {
    let mut panel = panel_at(9, 7);

    assert_eq!(panel.selection_summary(), None);

    let date = panel.date_range()[0];
    panel.handle_date_select(date);
    assert_eq!(panel.selection_summary(), None);
}

#[test]
fn test_selection_summary_選択内容を表示用に返すこと() {
    let mut panel = panel_at(9, 7);

    let date = panel.date_range()[0];
    panel.handle_date_select(date);
    panel.handle_time_select(555);
    let actual = panel.selection_summary().unwrap();

    assert_eq!(actual.get_date(), "Sunday, March 10, 2024");
    assert_eq!(actual.get_time(), "9:15 AM");
}

#[test]
fn test_handle_confirm_タイムスタンプを引き渡すこと() {
    let mut panel = panel_at(9, 7);
    let mut handoff = RecordingHandoff { timestamps: vec![] };

    let date = panel.date_range()[0];
    panel.handle_date_select(date);
    panel.handle_time_select(555);
    let actual = panel.handle_confirm(&mut handoff).unwrap();

    assert_eq!(actual, Some(1709996400 + 555 * 60));
    assert_eq!(handoff.timestamps, vec![1709996400 + 555 * 60]);
    assert!(panel.state().is_empty());
}

#[test]
fn test_handle_confirm_未選択なら引き渡さないこと() {
    let mut panel = panel_at(9, 7);
    let mut handoff = RecordingHandoff { timestamps: vec![] };

    let date = panel.date_range()[1];
    panel.handle_date_select(date);
    let actual = panel.handle_confirm(&mut handoff).unwrap();

    assert_eq!(actual, None);
    assert!(handoff.timestamps.is_empty());
    assert_eq!(panel.state().get_selected_date(), Some(panel.date_range()[1]));
}

#[test]
fn test_handle_reset_選択を解除すること() {
    let mut panel = panel_at(9, 7);

    let date = panel.date_range()[1];
    panel.handle_date_select(date);
    panel.handle_time_select(600);
    panel.handle_reset();

    assert!(panel.state().is_empty());
    assert!(panel.time_choices().is_empty());
}
