use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] yaml_rust::ScanError),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("no `timestamp` query parameter in {0}")]
    MissingTimestamp(String),
    #[error("`{0}` is not a valid timestamp")]
    InvalidTimestamp(String),
    #[error("failed to open browser")]
    BrowserLaunch(#[source] std::io::Error),
}
