//! Prompt and video generation.

use serde_json::json;
use tracing::{error, info};

use gemini_client::GeminiClient;
use veo_client::VeoClient;
use videoagent_common::{CommentsAnalysis, GeneratedPrompt, VideoAgentError, VideoInsights};

const SYSTEM_PROMPT: &str = "\
You are a professional video creative expert. From the provided video data \
and comment analysis, write one compelling short-video prompt.

Requirements:
1. Concise, vivid, and visual.
2. At most 200 characters.
3. Blend the trending topic with the user's request.
4. Output plain descriptive text only, no tags or formatting.";

const DEFAULT_USER_REQUEST: &str = "an engaging short video";

pub struct PromptGenerator {
    llm: GeminiClient,
}

impl PromptGenerator {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }

    /// Generate a prompt from the analysis context and the user's request.
    /// Returns both the plain text and a JSON form for downstream backends.
    pub async fn generate(
        &self,
        insights: &VideoInsights,
        comments: &CommentsAnalysis,
        user_input: &str,
    ) -> Result<GeneratedPrompt, VideoAgentError> {
        info!(bvid = %insights.bvid, "Generating prompt");

        let user_message = build_user_message(insights, comments, user_input);
        let text = self
            .llm
            .generate(SYSTEM_PROMPT, &user_message, 0.7)
            .await
            .map_err(|e| {
                error!(error = %e, "Prompt generation failed");
                VideoAgentError::Generation(e.to_string())
            })?;

        let json = json!({
            "prompt": text,
            "style": "realistic",
            "duration": 5,
            "aspect_ratio": "16:9",
            "metadata": {
                "source_video": insights.bvid,
                "keywords": comments.keywords.iter().take(5).collect::<Vec<_>>(),
            }
        });

        info!("Prompt generated");
        Ok(GeneratedPrompt { text, json })
    }
}

fn build_user_message(
    insights: &VideoInsights,
    comments: &CommentsAnalysis,
    user_input: &str,
) -> String {
    let tags = insights
        .tags
        .iter()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let keywords = comments
        .keywords
        .iter()
        .take(10)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let request = if user_input.is_empty() {
        DEFAULT_USER_REQUEST
    } else {
        user_input
    };

    format!(
        "Video information:\n\
         - Title: {}\n\
         - Description: {}\n\
         - Tags: {}\n\n\
         Hot comment keywords: {}\n\n\
         User request: {}\n\n\
         Write the video prompt:",
        insights.title, insights.description, tags, keywords, request,
    )
}

pub struct VideoGenerator {
    backend: VeoClient,
}

impl VideoGenerator {
    pub fn new(backend: VeoClient) -> Self {
        Self { backend }
    }

    /// Produce a video URL for a prompt. In mock mode the URL is
    /// deterministic, so the workflow stays testable without the backend.
    pub async fn create(&self, prompt: &str) -> Result<String, VideoAgentError> {
        info!("Creating video");
        self.backend.generate_video(prompt).await.map_err(|e| {
            error!(error = %e, "Video creation failed");
            VideoAgentError::Generation(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_includes_context_fields() {
        let insights = VideoInsights {
            title: "Robot dog parkour".to_string(),
            description: "A robot dog runs an obstacle course".to_string(),
            tags: vec!["robotics".to_string(), "AI".to_string()],
            ..Default::default()
        };
        let comments = CommentsAnalysis {
            total: 2,
            keywords: vec!["robot".to_string(), "parkour".to_string()],
            ..Default::default()
        };

        let msg = build_user_message(&insights, &comments, "make it cinematic");
        assert!(msg.contains("Robot dog parkour"));
        assert!(msg.contains("robotics, AI"));
        assert!(msg.contains("robot, parkour"));
        assert!(msg.contains("make it cinematic"));
    }

    #[test]
    fn empty_user_input_falls_back_to_default_request() {
        let msg = build_user_message(
            &VideoInsights::default(),
            &CommentsAnalysis::default(),
            "",
        );
        assert!(msg.contains(DEFAULT_USER_REQUEST));
    }
}
