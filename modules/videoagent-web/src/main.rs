use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Form, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bili_client::BiliClient;
use gemini_client::GeminiClient;
use veo_client::VeoClient;
use videoagent_agent::{
    HotspotFinder, PromptGenerator, VideoAnalyzer, VideoGenerator, WorkflowDeps, WorkflowRunner,
};
use videoagent_common::{config::parse_keywords, Config, Task, TaskKind, TaskStatus};

mod store;
mod templates;

use store::{MemoryTaskStore, TaskStore};
use templates::*;

// --- App State ---

struct AppState {
    store: Arc<dyn TaskStore>,
    runner: Arc<WorkflowRunner>,
    default_keywords: Vec<String>,
}

// --- Views ---

/// Display-ready task projection consumed by the templates.
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status_label: &'static str,
    pub kind_label: String,
    pub created: String,
    pub last_message: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

fn task_to_view(task: &Task) -> TaskView {
    TaskView {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        status_label: task.status.as_str(),
        kind_label: task.kind.as_str().to_string(),
        created: task.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        last_message: task
            .result
            .as_ref()
            .and_then(|r| r.messages.last().cloned()),
        video_url: task.result.as_ref().and_then(|r| r.video_url.clone()),
        error: task.error.clone(),
    }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("videoagent=info".parse()?))
        .init();

    let config = Config::from_env();

    let bili = BiliClient::new(config.bili_cookie.clone());
    let deps = WorkflowDeps {
        hotspots: Arc::new(HotspotFinder::new(
            bili.clone(),
            config.hotspot.weights.clone(),
        )),
        analyzer: Arc::new(VideoAnalyzer::new(bili)),
        prompts: Arc::new(PromptGenerator::new(GeminiClient::new(
            &config.gemini_api_key,
        ))),
        videos: Arc::new(VideoGenerator::new(VeoClient::new(
            config.veo_api_key.clone(),
        ))),
        hotspot_config: config.hotspot.clone(),
    };

    let state = Arc::new(AppState {
        store: Arc::new(MemoryTaskStore::new(config.task_store_capacity)),
        runner: Arc::new(WorkflowRunner::new(deps)),
        default_keywords: config.hotspot.keywords.clone(),
    });

    let app = Router::new()
        .route("/", get(index_page))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", get(get_task))
        .route("/api/stats", get(get_stats))
        .route("/health", get(health))
        .with_state(state)
        // Polled fragments must never be cached
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("VideoAgent web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

async fn index_page() -> impl IntoResponse {
    Html(render_index())
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tasks = state.store.list_recent(20).await;
    let views: Vec<TaskView> = tasks.iter().map(task_to_view).collect();
    Html(render_task_cards(&views))
}

#[derive(Deserialize)]
struct CreateTaskForm {
    #[serde(default)]
    task_type: String,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    user_input: String,
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateTaskForm>,
) -> impl IntoResponse {
    let kind = TaskKind::parse(&form.task_type);
    let mut keywords = parse_keywords(&form.keywords);
    if keywords.is_empty() {
        keywords = state.default_keywords.clone();
    }

    let task = Task::new(kind, keywords, form.user_input.trim().to_string());
    let view = task_to_view(&task);
    info!(task_id = %task.id, kind = kind.as_str(), "Task created");

    state.store.put(task.clone()).await;
    tokio::spawn(run_task(state.clone(), task));

    Html(render_task_card(&view))
}

/// Drive one task through the workflow, keeping the store in sync with
/// its status transitions.
async fn run_task(state: Arc<AppState>, mut task: Task) {
    task.status = TaskStatus::Running;
    task.updated_at = Utc::now();
    state.store.put(task.clone()).await;

    let result = state
        .runner
        .run(task.id, task.kind, &task.user_input, &task.keywords)
        .await;

    task.status = if result.error.is_none() {
        TaskStatus::Completed
    } else {
        TaskStatus::Failed
    };
    task.error = result.error.clone();
    task.result = Some(result);
    task.updated_at = Utc::now();

    if let Some(err) = &task.error {
        error!(task_id = %task.id, error = %err, "Task failed");
    } else {
        info!(task_id = %task.id, "Task completed");
    }
    state.store.put(task).await;
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid task id" })),
            )
        }
    };

    match state.store.get(uuid).await {
        Some(task) => (StatusCode::OK, Json(json!(task))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "task not found" })),
        ),
    }
}

async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.store.stats().await;
    Html(render_stats(&stats))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
