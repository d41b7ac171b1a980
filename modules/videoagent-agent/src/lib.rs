pub mod analyzer;
pub mod generator;
pub mod hotspot;
pub mod workflow;

pub use analyzer::VideoAnalyzer;
pub use generator::{PromptGenerator, VideoGenerator};
pub use hotspot::{HotspotFinder, VideoSearch};
pub use workflow::{
    HotspotSource, InsightSource, PromptSource, VideoBackend, WorkflowDeps, WorkflowRunner,
};
