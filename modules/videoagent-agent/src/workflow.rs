//! The workflow runner: a plain sequential state machine.
//!
//! Four entry routes selected by task kind: hotspot runs the whole chain,
//! analyze/generate skip earlier steps, complete just finalizes. A failing
//! step records its error on the state and stops the chain; the finalize
//! step always runs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use videoagent_common::{
    CommentsAnalysis, GeneratedPrompt, HotspotConfig, TaskKind, VideoAgentError, VideoInsights,
    VideoRecord, WorkflowState,
};

use crate::analyzer::VideoAnalyzer;
use crate::generator::{PromptGenerator, VideoGenerator};
use crate::hotspot::{HotspotFinder, VideoSearch};

/// Comments fetched per analysis pass; the analyzer distills these down.
const COMMENT_FETCH_LIMIT: u32 = 50;

// ---------------------------------------------------------------------------
// Step seams — mockable for deterministic workflow tests
// ---------------------------------------------------------------------------

#[async_trait]
pub trait HotspotSource: Send + Sync {
    async fn find_hotspots(
        &self,
        keywords: &[String],
        top_k: usize,
        lookback_days: i64,
    ) -> Vec<VideoRecord>;
}

#[async_trait]
pub trait InsightSource: Send + Sync {
    async fn analyze_video(&self, video: &VideoRecord) -> VideoInsights;
    async fn analyze_comments(&self, bvid: &str) -> CommentsAnalysis;
}

#[async_trait]
pub trait PromptSource: Send + Sync {
    async fn generate(
        &self,
        insights: &VideoInsights,
        comments: &CommentsAnalysis,
        user_input: &str,
    ) -> Result<GeneratedPrompt, VideoAgentError>;
}

#[async_trait]
pub trait VideoBackend: Send + Sync {
    async fn create(&self, prompt: &str) -> Result<String, VideoAgentError>;
}

#[async_trait]
impl<S: VideoSearch> HotspotSource for HotspotFinder<S> {
    async fn find_hotspots(
        &self,
        keywords: &[String],
        top_k: usize,
        lookback_days: i64,
    ) -> Vec<VideoRecord> {
        HotspotFinder::find_hotspots(self, keywords, top_k, lookback_days).await
    }
}

#[async_trait]
impl InsightSource for VideoAnalyzer {
    async fn analyze_video(&self, video: &VideoRecord) -> VideoInsights {
        VideoAnalyzer::analyze_video(self, video).await
    }

    async fn analyze_comments(&self, bvid: &str) -> CommentsAnalysis {
        VideoAnalyzer::analyze_comments(self, bvid, COMMENT_FETCH_LIMIT).await
    }
}

#[async_trait]
impl PromptSource for PromptGenerator {
    async fn generate(
        &self,
        insights: &VideoInsights,
        comments: &CommentsAnalysis,
        user_input: &str,
    ) -> Result<GeneratedPrompt, VideoAgentError> {
        PromptGenerator::generate(self, insights, comments, user_input).await
    }
}

#[async_trait]
impl VideoBackend for VideoGenerator {
    async fn create(&self, prompt: &str) -> Result<String, VideoAgentError> {
        VideoGenerator::create(self, prompt).await
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Immutable step dependencies for the workflow runner.
#[derive(Clone)]
pub struct WorkflowDeps {
    pub hotspots: Arc<dyn HotspotSource>,
    pub analyzer: Arc<dyn InsightSource>,
    pub prompts: Arc<dyn PromptSource>,
    pub videos: Arc<dyn VideoBackend>,
    pub hotspot_config: HotspotConfig,
}

pub struct WorkflowRunner {
    deps: WorkflowDeps,
}

impl WorkflowRunner {
    pub fn new(deps: WorkflowDeps) -> Self {
        Self { deps }
    }

    /// Run one task to completion and return its final state.
    /// Never returns an error: failures are recorded on the state.
    pub async fn run(
        &self,
        task_id: Uuid,
        kind: TaskKind,
        user_input: &str,
        keywords: &[String],
    ) -> WorkflowState {
        info!(%task_id, kind = kind.as_str(), "Workflow started");

        let mut state = WorkflowState::new(task_id, kind, user_input, keywords);
        state.enter_step("routing");
        state.push_message(format!("Processing task: {}", state.user_input));

        let outcome = self.run_chain(&mut state, kind).await;
        if let Err(e) = outcome {
            error!(%task_id, error = %e, "Workflow step failed");
            state.error = Some(e.to_string());
            state.push_message(format!("Step failed: {e}"));
        }

        self.finish(&mut state);
        info!(
            %task_id,
            completed = state.completed,
            step = %state.current_step,
            "Workflow finished"
        );
        state
    }

    async fn run_chain(
        &self,
        state: &mut WorkflowState,
        kind: TaskKind,
    ) -> Result<(), VideoAgentError> {
        if matches!(kind, TaskKind::Hotspot) {
            self.find_hotspots(state).await;
        }
        if matches!(kind, TaskKind::Hotspot | TaskKind::Analyze) {
            self.analyze(state).await?;
        }
        if matches!(kind, TaskKind::Hotspot | TaskKind::Analyze | TaskKind::Generate) {
            self.generate(state).await?;
            self.create_video(state).await?;
        }
        Ok(())
    }

    async fn find_hotspots(&self, state: &mut WorkflowState) {
        state.enter_step("finding_hotspots");

        let cfg = &self.deps.hotspot_config;
        let keywords = if state.keywords.is_empty() {
            cfg.keywords.clone()
        } else {
            state.keywords.clone()
        };

        let hotspots = self
            .deps
            .hotspots
            .find_hotspots(&keywords, cfg.top_k, cfg.lookback_days)
            .await;

        state.push_message(format!("Found {} trending videos", hotspots.len()));
        state.selected_video = hotspots.first().cloned();
        state.hotspot_videos = hotspots;
    }

    async fn analyze(&self, state: &mut WorkflowState) -> Result<(), VideoAgentError> {
        state.enter_step("analyzing");

        let video = state
            .selected_video
            .clone()
            .ok_or_else(|| VideoAgentError::Validation("no selected video".to_string()))?;

        let insights = self.deps.analyzer.analyze_video(&video).await;
        let comments = self.deps.analyzer.analyze_comments(&video.bvid).await;

        state.video_insights = Some(insights);
        state.comments_analysis = Some(comments);
        state.push_message("Video analysis complete");
        Ok(())
    }

    async fn generate(&self, state: &mut WorkflowState) -> Result<(), VideoAgentError> {
        state.enter_step("generating_prompt");

        // A generate-only task has no analysis; empty context is fine.
        let insights = state.video_insights.clone().unwrap_or_default();
        let comments = state.comments_analysis.clone().unwrap_or_default();

        let prompt = self
            .deps
            .prompts
            .generate(&insights, &comments, &state.user_input)
            .await?;

        state.prompt_text = prompt.text;
        state.prompt_json = Some(prompt.json);
        state.push_message("Prompt generated");
        Ok(())
    }

    async fn create_video(&self, state: &mut WorkflowState) -> Result<(), VideoAgentError> {
        state.enter_step("creating_video");

        if state.prompt_text.is_empty() {
            return Err(VideoAgentError::Validation("no prompt text".to_string()));
        }

        let url = self.deps.videos.create(&state.prompt_text).await?;
        state.video_url = Some(url);
        state.push_message("Video created");
        Ok(())
    }

    fn finish(&self, state: &mut WorkflowState) {
        state.enter_step("completed");
        state.completed = state.error.is_none();
        if state.completed {
            state.push_message("All steps complete");
        }
    }
}
