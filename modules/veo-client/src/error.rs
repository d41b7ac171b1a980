use thiserror::Error;

pub type Result<T> = std::result::Result<T, VeoError>;

#[derive(Debug, Error)]
pub enum VeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for VeoError {
    fn from(err: reqwest::Error) -> Self {
        VeoError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for VeoError {
    fn from(err: serde_json::Error) -> Self {
        VeoError::Parse(err.to_string())
    }
}
