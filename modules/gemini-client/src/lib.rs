mod client;
mod types;

pub use client::GeminiClient;
pub use types::{Candidate, Content, GenerateRequest, GenerateResponse, Part};
