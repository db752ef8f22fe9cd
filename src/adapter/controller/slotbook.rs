use chrono::{NaiveDate, TimeZone};
use log::warn;
use regex::Regex;
use slotbook::adapter::gateway::clock::SystemClock;
use slotbook::adapter::gateway::success_url::SuccessUrlHandoff;
use slotbook::adapter::gateway::yaml::{load_config_from_file, BookingConfig};
use slotbook::application::booking_panel::BookingPanel;
use slotbook::application::interface::ClockTrait;
use slotbook::entity::booking_summary::summarize_timestamp;
use slotbook::entity::date_info::DateInfo;
use slotbook::entity::time_slot::TimeSlot;
use std::env;
use std::fmt;
use std::io::{self, stdin, stdout, Write};
use std::process;
use termion::input::TermRead;
use termion::{color, style};
use unicode_width::UnicodeWidthStr;

const CONFIG_ENV: &str = "SLOTBOOK_CONFIG";
const DATES_PER_ROW: usize = 7;
const SLOTS_PER_ROW: usize = 8;

const HELP: &str = "\
dates                       show selectable dates
date <index|YYYY-MM-DD>     select a date
slots                       show time slots for the selected date
time <9:15 AM|21:15|555>    select a time
confirm                     confirm the booking
reset                       clear the selection
quit                        exit";

#[derive(Debug, PartialEq)]
enum DateArg {
    Index(usize),
    Date(NaiveDate),
}

#[derive(Debug, PartialEq)]
enum Command {
    Dates,
    Date(DateArg),
    Slots,
    Time(u32),
    Confirm,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

// "9:15 AM", "21:15", "555"(0時からの分) のいずれか
fn parse_time(s: &str) -> Option<u32> {
    let twelve_hour = Regex::new(r"^(\d{1,2}):(\d{2})\s*([AaPp])[Mm]$").ok()?;
    let twenty_four_hour = Regex::new(r"^(\d{1,2}):(\d{2})$").ok()?;
    let plain_minutes = Regex::new(r"^\d+$").ok()?;

    if let Some(caps) = twelve_hour.captures(s) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        if !(1..=12).contains(&hour) || minute >= 60 {
            return None;
        }

        let pm = caps[3].eq_ignore_ascii_case("p");
        return Some(((hour % 12) + if pm { 12 } else { 0 }) * 60 + minute);
    }

    if let Some(caps) = twenty_four_hour.captures(s) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        if hour >= 24 || minute >= 60 {
            return None;
        }

        return Some(hour * 60 + minute);
    }

    if plain_minutes.is_match(s) {
        return s.parse().ok();
    }

    None
}

#[test]
fn test_parse_time_12時間表記() {
    assert_eq!(parse_time("9:15 AM"), Some(555));
    assert_eq!(parse_time("12:00 AM"), Some(0));
    assert_eq!(parse_time("12:30 pm"), Some(750));
    assert_eq!(parse_time("11:45PM"), Some(1425));
}

#[test]
fn test_parse_time_24時間表記と分() {
    assert_eq!(parse_time("21:15"), Some(1275));
    assert_eq!(parse_time("09:00"), Some(540));
    assert_eq!(parse_time("555"), Some(555));
}

#[test]
fn test_parse_time_異常系() {
    assert_eq!(parse_time("13:00 PM"), None);
    assert_eq!(parse_time("24:00"), None);
    assert_eq!(parse_time("9:60"), None);
    assert_eq!(parse_time("soon"), None);
    assert_eq!(parse_time(""), None);
}

fn parse_date_arg(s: &str) -> Option<DateArg> {
    if let Ok(index) = s.parse::<usize>() {
        return Some(DateArg::Index(index));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(DateArg::Date)
}

fn parse_command(untrimmed_line: &str) -> Command {
    // 整形
    let line = match Regex::new(r"\s+") {
        Ok(re) => re.replace_all(untrimmed_line, " ").trim().to_string(),
        Err(_) => untrimmed_line.trim().to_string(),
    };

    let (head, rest) = match line.split_once(' ') {
        Some((head, rest)) => (head, rest),
        None => (line.as_str(), ""),
    };

    match head {
        "dates" | "ds" => Command::Dates,
        "date" | "d" => match parse_date_arg(rest) {
            Some(arg) => Command::Date(arg),
            None => Command::Unknown(line.clone()),
        },
        "slots" | "ss" => Command::Slots,
        "time" | "t" => match parse_time(rest) {
            Some(minutes) => Command::Time(minutes),
            None => Command::Unknown(line.clone()),
        },
        "confirm" => Command::Confirm,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.clone()),
    }
}

#[test]
fn test_parse_command_空白を正規化して解釈すること() {
    assert_eq!(parse_command("  time   9:15   AM "), Command::Time(555));
    assert_eq!(parse_command("date 3"), Command::Date(DateArg::Index(3)));
    assert_eq!(
        parse_command("d 2024-03-20"),
        Command::Date(DateArg::Date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()))
    );
    assert_eq!(parse_command("confirm"), Command::Confirm);
    assert_eq!(parse_command("q"), Command::Quit);
}

#[test]
fn test_parse_command_引数が不正な場合はunknown() {
    assert_eq!(parse_command("date tomorrow"), Command::Unknown("date tomorrow".to_string()));
    assert_eq!(parse_command("time"), Command::Unknown("time".to_string()));
    assert_eq!(parse_command("book"), Command::Unknown("book".to_string()));
}

// 表示幅でそろえる
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        return s.to_string();
    }

    format!("{}{}", s, " ".repeat(width - w))
}

#[test]
fn test_pad_表示幅に合わせて空白を足すこと() {
    assert_eq!(pad("9:00 AM", 9), "9:00 AM  ");
    assert_eq!(pad("月", 4), "月  ");
    assert_eq!(pad("11:45 PM", 3), "11:45 PM");
}

fn render_dates(out: &mut impl Write, choices: &[DateInfo]) -> io::Result<()> {
    for (i, info) in choices.iter().enumerate() {
        let cell = pad(
            &format!(
                "{:>2} {} {:>2} {}",
                i,
                info.get_day_of_week(),
                info.get_day_of_month(),
                info.get_month()
            ),
            15,
        );

        if info.is_selected() {
            write!(out, "{}{}{}", color::Fg(color::Green), cell, color::Fg(color::Reset))?;
        } else if info.is_today() {
            write!(out, "{}{}{}", style::Bold, cell, style::Reset)?;
        } else {
            write!(out, "{}", cell)?;
        }

        if (i + 1) % DATES_PER_ROW == 0 {
            writeln!(out)?;
        }
    }
    writeln!(out)
}

fn render_slots(out: &mut impl Write, slots: &[TimeSlot], selected: Option<u32>) -> io::Result<()> {
    for (i, slot) in slots.iter().enumerate() {
        let cell = pad(slot.get_label(), 10);

        if Some(slot.get_value()) == selected {
            write!(out, "{}{}{}", color::Fg(color::Green), cell, color::Fg(color::Reset))?;
        } else if slot.is_disabled() {
            write!(out, "{}{}{}", style::Faint, cell, style::Reset)?;
        } else {
            write!(out, "{}", cell)?;
        }

        if (i + 1) % SLOTS_PER_ROW == 0 {
            writeln!(out)?;
        }
    }
    Ok(())
}

fn render_selection<C: ClockTrait>(out: &mut impl Write, panel: &BookingPanel<C>) -> io::Result<()>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    match panel.selection_summary() {
        Some(summary) => writeln!(out, "Your selection: {}", summary)?,
        None => writeln!(out, "Your selection: -")?,
    }

    let confirm = if panel.state().is_confirm_enabled() {
        "ready"
    } else {
        "select a date and time"
    };
    writeln!(out, "Confirm: {}", confirm)
}

fn select_date<C: ClockTrait>(out: &mut impl Write, panel: &mut BookingPanel<C>, arg: DateArg) -> io::Result<()>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    let date_opt = match arg {
        DateArg::Index(index) => panel.date_range().get(index).copied(),
        DateArg::Date(date) => panel.date_range().iter().find(|&&d| d == date).copied(),
    };

    match date_opt {
        Some(date) => {
            if !panel.handle_date_select(date) {
                return writeln!(out, "That date has passed.");
            }
            render_slots(out, panel.time_choices(), panel.state().get_selected_time())?;
            render_selection(out, panel)
        }
        None => writeln!(out, "That date is not offered."),
    }
}

fn select_time<C: ClockTrait>(out: &mut impl Write, panel: &mut BookingPanel<C>, minutes: u32) -> io::Result<()>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    if panel.state().get_selected_date().is_none() {
        return writeln!(out, "Select a date first.");
    }

    // 表示中で選択可能な枠だけを受け付ける
    let enabled = panel
        .time_choices()
        .iter()
        .any(|slot| slot.get_value() == minutes && !slot.is_disabled());
    if !enabled {
        return writeln!(out, "That time is not available.");
    }

    panel.handle_time_select(minutes);
    render_selection(out, panel)
}

fn confirm<C: ClockTrait>(
    out: &mut impl Write,
    panel: &mut BookingPanel<C>,
    handoff: &mut SuccessUrlHandoff,
) -> io::Result<()>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    let tz = panel.clock().now().timezone();

    match panel.handle_confirm(handoff) {
        Ok(Some(timestamp)) => {
            if let Some(summary) = summarize_timestamp(&tz, timestamp) {
                writeln!(out, "{}Booking confirmed:{} {}", style::Bold, style::Reset, summary)?;
            }
            if let Some(url) = handoff.get_last_url() {
                writeln!(out, "{}", url)?;
            }
            Ok(())
        }
        Ok(None) => writeln!(out, "Select a date and time first."),
        Err(e) => {
            warn!("handoff failed: {}", e);
            writeln!(out, "Could not complete the booking: {}", e)
        }
    }
}

fn main() {
    env_logger::init();

    let config = match env::var(CONFIG_ENV) {
        Ok(path) => match load_config_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        Err(_) => BookingConfig::default(),
    };

    let mut panel = BookingPanel::new(SystemClock);
    let mut handoff = SuccessUrlHandoff::from_config(&config);

    // controllerで実体を見るのを避けるために、1つ関数を切る
    if let Err(e) = application(&mut panel, &mut handoff) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn application<C: ClockTrait>(panel: &mut BookingPanel<C>, handoff: &mut SuccessUrlHandoff) -> io::Result<()>
where
    <C::Tz as TimeZone>::Offset: fmt::Display,
{
    let stdin = stdin();
    let mut stdin = stdin.lock();
    let mut stdout = stdout();

    writeln!(stdout, "{}Book Your Session{}", style::Bold, style::Reset)?;
    writeln!(stdout, "Select a date and time that works best for you")?;
    render_dates(&mut stdout, &panel.date_choices())?;

    let header: &str = "slotbook>";

    loop {
        write!(stdout, "{}", header)?;
        stdout.flush()?;

        let line = match stdin.read_line()? {
            Some(line) => line,
            None => break,
        };

        match parse_command(&line) {
            Command::Dates => render_dates(&mut stdout, &panel.date_choices())?,
            Command::Date(arg) => select_date(&mut stdout, panel, arg)?,
            Command::Slots => {
                if panel.state().get_selected_date().is_none() {
                    writeln!(stdout, "Select a date first.")?;
                } else {
                    render_slots(&mut stdout, panel.time_choices(), panel.state().get_selected_time())?;
                }
            }
            Command::Time(minutes) => select_time(&mut stdout, panel, minutes)?,
            Command::Confirm => confirm(&mut stdout, panel, handoff)?,
            Command::Reset => {
                panel.handle_reset();
                render_selection(&mut stdout, panel)?;
            }
            Command::Help => writeln!(stdout, "{}", HELP)?,
            Command::Quit => break,
            Command::Unknown(line) => {
                if !line.is_empty() {
                    writeln!(stdout, "Unknown command: {} (try `help`)", line)?;
                }
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
