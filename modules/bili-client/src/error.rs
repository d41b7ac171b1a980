use thiserror::Error;

pub type Result<T> = std::result::Result<T, BiliError>;

#[derive(Debug, Error)]
pub enum BiliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BiliError {
    fn from(err: reqwest::Error) -> Self {
        BiliError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BiliError {
    fn from(err: serde_json::Error) -> Self {
        BiliError::Parse(err.to_string())
    }
}
