use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::content::ContentRecord;
use crate::narration::NarrationEngine;
use crate::renderer::ManimRenderer;
use crate::templates::SceneTemplates;

/// Fixed artifact names under the output directory. Every request overwrites
/// them; concurrent requests race and the last writer wins.
pub const FINAL_VIDEO: &str = "final_video.mp4";
pub const FINAL_AUDIO: &str = "final_audio.mp3";

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
    pub video_path: String,
    pub audio_path: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Any error anywhere in the pipeline becomes a 500 with the error text as
/// detail; there is no finer-grained failure taxonomy.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: format!("{:#}", self.0),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub struct AppState {
    pub config: AppConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> std::result::Result<Json<GenerateResponse>, AppError> {
    tracing::info!(topic = %request.topic, "generate request");

    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || run_pipeline(&config, &request))
        .await
        .context("Pipeline task panicked")??;

    tracing::info!(video = %response.video_path, "generate complete");
    Ok(Json(response))
}

/// The whole per-request pipeline: render, narrate, publish.
///
/// Rendering and narration are independent but run sequentially; both are
/// blocking external-process calls, so callers on the async side must wrap
/// this in `spawn_blocking`.
pub fn run_pipeline(config: &AppConfig, request: &GenerateRequest) -> Result<GenerateResponse> {
    let content = ContentRecord::from_prompt(&request.topic, &request.prompt);
    render_and_publish(config, &content, &request.prompt)
}

/// Render a content record and publish the artifacts to the fixed paths.
/// Also the entry point for the offline `render` subcommand.
pub fn render_and_publish(
    config: &AppConfig,
    content: &ContentRecord,
    narration_text: &str,
) -> Result<GenerateResponse> {
    // Everything intermediate lives in a per-request directory that is
    // discarded on drop, success or not.
    let work_dir = tempfile::tempdir().context("Failed to create work directory")?;

    let scene = SceneTemplates::build(content);
    let renderer = ManimRenderer::new(scene, &config.renderer);
    let video = renderer.render(work_dir.path())?;

    let narration = NarrationEngine::new(&config.narration);
    let audio = work_dir.path().join("narration.mp3");
    narration.synthesize(narration_text, &audio)?;

    let output_dir = &config.output.dir;
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let final_video = output_dir.join(FINAL_VIDEO);
    let final_audio = output_dir.join(FINAL_AUDIO);
    std::fs::copy(&video, &final_video).context("Failed to publish video")?;
    std::fs::copy(&audio, &final_audio).context("Failed to publish audio")?;

    Ok(GenerateResponse {
        status: "success".to_string(),
        video_path: final_video.display().to_string(),
        audio_path: final_audio.display().to_string(),
    })
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState { config });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
