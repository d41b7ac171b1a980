use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoAgentError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
