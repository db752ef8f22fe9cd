use crate::adapter::gateway::yaml::BookingConfig;
use crate::application::interface::BookingHandoffTrait;
use crate::error::BookingError;
use log::info;
use url::Url;

const TIMESTAMP_KEY: &str = "timestamp";

/// `<success_url>?timestamp=<epoch seconds>`, keeping any other query pairs.
pub fn build_success_url(success_url: &str, timestamp: i64) -> Result<Url, BookingError> {
    let mut url = Url::parse(success_url)?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TIMESTAMP_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(TIMESTAMP_KEY, &timestamp.to_string());

    Ok(url)
}

// 確認画面側。URLからタイムスタンプを取り出す
pub fn parse_success_url(success_url: &str) -> Result<i64, BookingError> {
    let url = Url::parse(success_url)?;

    let value = url
        .query_pairs()
        .find(|(key, _)| key == TIMESTAMP_KEY)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| BookingError::MissingTimestamp(success_url.to_string()))?;

    parse_timestamp(&value)
}

pub fn parse_timestamp(value: &str) -> Result<i64, BookingError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| BookingError::InvalidTimestamp(value.to_string()))
}

pub struct SuccessUrlHandoff {
    success_url: String,
    open_browser: bool,
    last_url: Option<Url>,
}

impl SuccessUrlHandoff {
    pub fn new(success_url: &str, open_browser: bool) -> Self {
        Self {
            success_url: success_url.to_string(),
            open_browser,
            last_url: None,
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(config.get_success_url(), config.get_open_browser())
    }

    pub fn get_last_url(&self) -> Option<&Url> {
        self.last_url.as_ref()
    }
}

impl BookingHandoffTrait for SuccessUrlHandoff {
    fn hand_off(&mut self, timestamp: i64) -> Result<(), BookingError> {
        let url = build_success_url(&self.success_url, timestamp)?;
        info!("redirecting to {}", url);

        if self.open_browser {
            webbrowser::open(url.as_str()).map_err(BookingError::BrowserLaunch)?;
        }

        self.last_url = Some(url);
        Ok(())
    }
}

#[test]
fn test_build_success_url_timestampを付与すること() {
    let actual = build_success_url("http://localhost:3000/success", 1710055800).unwrap();

    assert_eq!(actual.as_str(), "http://localhost:3000/success?timestamp=1710055800");
}

#[test]
fn test_build_success_url_既存のtimestampは置き換えること() {
    let actual =
        build_success_url("https://example.com/success?lang=ja&timestamp=1", 1710055800).unwrap();

    assert_eq!(
        actual.as_str(),
        "https://example.com/success?lang=ja&timestamp=1710055800"
    );
}

#[test]
fn test_build_success_url_不正なurlはエラー() {
    let actual = build_success_url("not a url", 0);

    assert!(matches!(actual, Err(BookingError::InvalidUrl(_))));
}

#[test]
fn test_parse_success_url_timestampを取り出すこと() {
    let url = build_success_url("https://example.com/success?lang=ja", 1710055800).unwrap();
    let actual = parse_success_url(url.as_str()).unwrap();

    assert_eq!(actual, 1710055800);
}

#[test]
fn test_parse_success_url_timestampが無い場合はエラー() {
    let actual = parse_success_url("https://example.com/success?lang=ja");

    assert!(matches!(actual, Err(BookingError::MissingTimestamp(_))));
}

#[test]
fn test_parse_success_url_数値でない場合はエラー() {
    let actual = parse_success_url("https://example.com/success?timestamp=tomorrow");

    assert!(matches!(actual, Err(BookingError::InvalidTimestamp(_))));
}

#[test]
fn test_hand_off_最後のurlを記録すること() {
    let mut handoff = SuccessUrlHandoff::new("http://localhost:3000/success", false);

    assert_eq!(handoff.get_last_url(), None);

    handoff.hand_off(1710055800).unwrap();

    assert_eq!(
        handoff.get_last_url().map(|url| url.as_str()),
        Some("http://localhost:3000/success?timestamp=1710055800")
    );
}

#[test]
fn test_hand_off_urlが不正な場合はエラーで記録しないこと() {
    let config = BookingConfig::new("::::", false);
    let mut handoff = SuccessUrlHandoff::from_config(&config);

    assert!(handoff.hand_off(0).is_err());
    assert_eq!(handoff.get_last_url(), None);
}
