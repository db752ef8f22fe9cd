use chrono::{Duration, NaiveDate, TimeZone};
use chrono_tz::America::New_York;
use slotbook::adapter::gateway::clock::FixedClock;
use slotbook::adapter::gateway::success_url::{parse_success_url, SuccessUrlHandoff};
use slotbook::application::booking_panel::BookingPanel;
use slotbook::application::booking_store::BookingStore;
use slotbook::entity::booking_summary::summarize_timestamp;
use slotbook::entity::datetime::{date_time_to_timestamp, get_current_time_rounded_up, is_time_slot_valid};

#[test]
fn test_夏時間開始日の朝9時7分に9時の枠は無効で9時15分は有効() {
    let now = New_York.with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let mut store = BookingStore::new(FixedClock::new(now));

    assert_eq!(get_current_time_rounded_up(&now), 555);

    store.select_date(now.date_naive());
    let slots = store.state().get_available_time_slots();

    let nine = slots.iter().find(|slot| slot.get_value() == 540).unwrap();
    let nine_fifteen = slots.iter().find(|slot| slot.get_value() == 555).unwrap();
    assert_eq!(nine.get_label(), "9:00 AM");
    assert!(nine.is_disabled());
    assert_eq!(nine_fifteen.get_label(), "9:15 AM");
    assert!(!nine_fifteen.is_disabled());
}

#[test]
fn test_日付と時刻を選んで確定すると同じタイムスタンプが返り状態が空になる() {
    let now = New_York.with_ymd_and_hms(2024, 3, 1, 13, 20, 0).unwrap();
    let dates: Vec<NaiveDate> = BookingPanel::new(FixedClock::new(now)).date_range().to_vec();

    for date in dates.iter().step_by(5) {
        for minutes in [0, 555, 780, 1425] {
            if !is_time_slot_valid(*date, minutes, &now) {
                continue;
            }

            let mut store = BookingStore::new(FixedClock::new(now));
            store.select_date(*date);
            store.select_time(minutes);

            assert_eq!(
                store.confirm_booking(),
                date_time_to_timestamp(&New_York, *date, minutes)
            );
            assert!(store.state().is_empty());
        }
    }
}

#[test]
fn test_時刻を選ばずに日付だけ変えて確定しても何も起きない() {
    let now = New_York.with_ymd_and_hms(2024, 3, 10, 9, 7, 0).unwrap();
    let mut store = BookingStore::new(FixedClock::new(now));

    store.select_date(now.date_naive());
    store.select_date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    let before = store.state().clone();

    assert_eq!(store.confirm_booking(), None);
    assert_eq!(store.state(), &before);
}

#[test]
fn test_時間が経って選んだ時刻が過ぎると選び直すまで確定できない() {
    let now = New_York.with_ymd_and_hms(2024, 3, 12, 7, 30, 0).unwrap();
    let mut panel = BookingPanel::new(FixedClock::new(now));
    let mut handoff = SuccessUrlHandoff::new("https://booking.example.com/success", false);

    let date = panel.date_range()[0];
    panel.handle_date_select(date);
    panel.handle_time_select(480);
    assert!(panel.selection_summary().is_some());

    panel.store_mut().clock_mut().advance(Duration::hours(2));
    assert!(panel.handle_date_select(date));

    assert_eq!(panel.state().get_selected_time(), None);
    assert_eq!(panel.selection_summary(), None);
    assert!(panel.time_choices().iter().take(38).all(|slot| slot.is_disabled()));
    assert!(!panel.time_choices()[38].is_disabled());

    assert_eq!(panel.handle_confirm(&mut handoff).unwrap(), None);
    assert_eq!(handoff.get_last_url(), None);
    assert_eq!(panel.state().get_selected_date(), Some(date));
}

#[test]
fn test_確定から確認画面までの引き渡し() {
    let now = New_York.with_ymd_and_hms(2024, 3, 8, 16, 0, 0).unwrap();
    let mut panel = BookingPanel::new(FixedClock::new(now));
    let mut handoff = SuccessUrlHandoff::new("https://booking.example.com/success?lang=en", false);

    // 夏時間開始日の2:30は存在しないので3:30として扱われる
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    panel.handle_date_select(date);
    panel.handle_time_select(150);
    let summary = panel.selection_summary().unwrap();

    let timestamp = panel.handle_confirm(&mut handoff).unwrap().unwrap();
    assert_eq!(timestamp, 1710055800);
    assert!(panel.state().is_empty());

    let url = handoff.get_last_url().unwrap().to_string();
    assert_eq!(
        url,
        "https://booking.example.com/success?lang=en&timestamp=1710055800"
    );

    let received = parse_success_url(&url).unwrap();
    let shown = summarize_timestamp(&New_York, received).unwrap();
    assert_eq!(shown, summary);
    assert_eq!(shown.get_date(), "Sunday, March 10, 2024");
    assert_eq!(shown.get_time(), "3:30 AM");
}
