pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, HotspotConfig, ScoreWeights};
pub use error::VideoAgentError;
pub use types::*;
