use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Hotspot records ---

/// One found video. Lives in memory for the duration of a single
/// `find_hotspots` call; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Unique video identifier, the sole dedup key.
    pub bvid: String,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Duration in seconds.
    pub duration: u32,
    /// Publish time, Unix epoch seconds.
    pub pubdate: i64,
    pub play: u64,
    pub like: u64,
    pub comment: u64,
    pub danmaku: u64,
    /// Thumbnail URL.
    pub pic: Option<String>,
    /// Hotspot score. Absent until the scoring step runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

// --- Analysis ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInsights {
    pub bvid: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub duration: u32,
    pub stats: VideoStats,
    pub author: String,
    pub pubdate: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoStats {
    pub view: u64,
    pub like: u64,
    pub coin: u64,
    pub favorite: u64,
    pub share: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsAnalysis {
    pub total: usize,
    pub hot_comments: Vec<HotComment>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotComment {
    pub content: String,
    pub like: u64,
    pub author: String,
}

// --- Generation ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    pub text: String,
    pub json: serde_json::Value,
}

// --- Tasks ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Hotspot,
    Analyze,
    Generate,
    Complete,
}

impl TaskKind {
    /// Parse a form value. Unknown values fall back to the full chain.
    pub fn parse(s: &str) -> Self {
        match s {
            "hotspot" => TaskKind::Hotspot,
            "analyze" => TaskKind::Analyze,
            "generate" => TaskKind::Generate,
            _ => TaskKind::Complete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Hotspot => "hotspot",
            TaskKind::Analyze => "analyze",
            TaskKind::Generate => "generate",
            TaskKind::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// A unit of work tracked by the task store and polled by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub kind: TaskKind,
    pub keywords: Vec<String>,
    pub user_input: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<WorkflowState>,
    pub error: Option<String>,
}

impl Task {
    pub fn new(kind: TaskKind, keywords: Vec<String>, user_input: String) -> Self {
        let now = Utc::now();
        let title = format!(
            "Task — {}",
            keywords
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        let description = if user_input.is_empty() {
            "Automated video creation".to_string()
        } else {
            user_input.clone()
        };
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            status: TaskStatus::Pending,
            kind,
            keywords,
            user_input,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }
}

// --- Workflow state ---

/// Everything a workflow run accumulates across its steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub task_id: Uuid,
    pub kind: TaskKind,
    pub user_input: String,
    pub keywords: Vec<String>,

    pub hotspot_videos: Vec<VideoRecord>,
    pub selected_video: Option<VideoRecord>,

    pub video_insights: Option<VideoInsights>,
    pub comments_analysis: Option<CommentsAnalysis>,

    pub prompt_text: String,
    pub prompt_json: Option<serde_json::Value>,
    pub video_url: Option<String>,

    pub current_step: String,
    pub error: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Human-readable progress log shown in the task detail.
    pub messages: Vec<String>,
}

impl WorkflowState {
    pub fn new(task_id: Uuid, kind: TaskKind, user_input: &str, keywords: &[String]) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            kind,
            user_input: user_input.to_string(),
            keywords: keywords.to_vec(),
            hotspot_videos: Vec::new(),
            selected_video: None,
            video_insights: None,
            comments_analysis: None,
            prompt_text: String::new(),
            prompt_json: None,
            video_url: None,
            current_step: "start".to_string(),
            error: None,
            completed: false,
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    pub fn enter_step(&mut self, step: &str) {
        self.current_step = step.to_string();
        self.updated_at = Utc::now();
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        self.updated_at = Utc::now();
    }
}
