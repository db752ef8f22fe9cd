use chrono::Local;
use slotbook::adapter::gateway::success_url::{parse_success_url, parse_timestamp};
use slotbook::entity::booking_summary::summarize_timestamp;
use slotbook::error::BookingError;
use std::env;
use std::process;

// URLでも数値そのままでも受け付ける
fn read_timestamp(arg: &str) -> Result<i64, BookingError> {
    if arg.contains("://") {
        return parse_success_url(arg);
    }

    parse_timestamp(arg)
}

#[test]
fn test_read_timestamp_urlから読み込むこと() {
    let actual = read_timestamp("http://localhost:3000/success?timestamp=1710055800");
    assert_eq!(actual.unwrap(), 1710055800);
}

#[test]
fn test_read_timestamp_数値から読み込むこと() {
    let actual = read_timestamp("1710055800");
    assert_eq!(actual.unwrap(), 1710055800);
}

#[test]
fn test_read_timestamp_異常系() {
    assert!(matches!(
        read_timestamp("http://localhost:3000/success"),
        Err(BookingError::MissingTimestamp(_))
    ));
    assert!(matches!(
        read_timestamp("next tuesday"),
        Err(BookingError::InvalidTimestamp(_))
    ));
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("show_booking");
        eprintln!("usage: {} <success_url|timestamp>", program);
        process::exit(2);
    }

    let timestamp = match read_timestamp(&args[1]) {
        Ok(timestamp) => timestamp,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match summarize_timestamp(&Local, timestamp) {
        Some(summary) => {
            println!("Booking Confirmed!");
            println!("Date: {}", summary.get_date());
            println!("Time: {}", summary.get_time());
        }
        None => {
            eprintln!("{}", BookingError::InvalidTimestamp(args[1].clone()));
            process::exit(1);
        }
    }
}
