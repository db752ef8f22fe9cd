use crate::error::BookingError;
use std::fs::File;
use std::io::prelude::*;
use yaml_rust::{Yaml, YamlLoader};

pub const DEFAULT_SUCCESS_URL: &str = "http://localhost:3000/success";

#[derive(Clone, Debug, PartialEq)]
pub struct BookingConfig {
    success_url: String,
    open_browser: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            success_url: DEFAULT_SUCCESS_URL.to_string(),
            open_browser: false,
        }
    }
}

impl BookingConfig {
    pub fn new(success_url: &str, open_browser: bool) -> Self {
        Self {
            success_url: success_url.to_string(),
            open_browser,
        }
    }

    pub fn get_success_url(&self) -> &str {
        &self.success_url
    }

    pub fn get_open_browser(&self) -> bool {
        self.open_browser
    }
}

// キーが存在しない場合は既定値を使う
pub fn yaml_to_config(config_yaml: &Yaml) -> BookingConfig {
    let default = BookingConfig::default();

    let success_url = config_yaml["success_url"]
        .as_str()
        .unwrap_or(default.get_success_url());
    let open_browser = config_yaml["open_browser"]
        .as_bool()
        .unwrap_or(default.get_open_browser());

    BookingConfig::new(success_url, open_browser)
}

pub fn load_config_from_str(yaml_str: &str) -> Result<BookingConfig, BookingError> {
    let docs = YamlLoader::load_from_str(yaml_str)?;

    match docs.first() {
        Some(config_yaml) => Ok(yaml_to_config(config_yaml)),
        None => Ok(BookingConfig::default()),
    }
}

pub fn load_config_from_file(config_file_path: &str) -> Result<BookingConfig, BookingError> {
    let mut text = String::new();
    File::open(config_file_path)
        .and_then(|mut file| file.read_to_string(&mut text))
        .map_err(|source| BookingError::ConfigRead {
            path: config_file_path.to_string(),
            source,
        })?;

    load_config_from_str(&text)
}

#[test]
fn test_load_config_from_str_全てのキーを読み込むこと() {
    let s = "
success_url: 'https://booking.example.com/success'
open_browser: true
";
    let actual = load_config_from_str(s).unwrap();
    let expected = BookingConfig::new("https://booking.example.com/success", true);

    assert_eq!(actual, expected);
}

#[test]
fn test_load_config_from_str_キーが存在しない場合は既定値() {
    let s = "
open_browser: true
";
    let actual = load_config_from_str(s).unwrap();

    assert_eq!(actual.get_success_url(), DEFAULT_SUCCESS_URL);
    assert!(actual.get_open_browser());
}

#[test]
fn test_load_config_from_str_空文字列の場合は既定値() {
    let actual = load_config_from_str("").unwrap();

    assert_eq!(actual, BookingConfig::default());
}

#[test]
fn test_load_config_from_str_型が違う値は既定値として扱うこと() {
    let s = "
success_url: 42
open_browser: 'yes please'
";
    let actual = load_config_from_str(s).unwrap();

    assert_eq!(actual, BookingConfig::default());
}

#[test]
fn test_load_config_from_str_壊れたyamlはエラー() {
    let s = "success_url: [unclosed";
    let actual = load_config_from_str(s);

    assert!(matches!(actual, Err(BookingError::ConfigParse(_))));
}

#[test]
fn test_load_config_from_str_解析エラーの位置が残ること() {
    let s = "success_url: [unclosed";
    let err = load_config_from_str(s).unwrap_err();

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<yaml_rust::ScanError>().is_some());
    assert!(err.to_string().starts_with("failed to parse config: "));
}

#[test]
fn test_load_config_from_file_存在しないファイルはエラー() {
    let actual = load_config_from_file("/nonexistent/slotbook.yaml");

    assert!(matches!(actual, Err(BookingError::ConfigRead { .. })));
}
