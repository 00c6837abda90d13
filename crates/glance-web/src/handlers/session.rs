//! 분석기 초기화 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::handlers::optional_json;
use crate::slot::AnalyzerSession;
use crate::AppState;

/// 초기화 요청
#[derive(Debug, Default, Deserialize)]
pub struct InitializeRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// 초기화 응답
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub status: &'static str,
    pub message: String,
    pub initialized_at: DateTime<Utc>,
}

/// POST /api/initialize
///
/// 이미 초기화되어 있으면 이전 세션(모니터 포함)을 정리하고 교체한다.
pub async fn initialize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<InitializeResponse>, ApiError> {
    let request: InitializeRequest = optional_json(&body)?;
    let api_key = request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("API key is required".to_string()))?;

    let analyzer = state.factory.build(api_key).map_err(|e| {
        warn!("분석기 초기화 실패: {e}");
        ApiError::Internal(format!("Failed to initialize: {e}"))
    })?;

    let replaced = state.slot.is_initialized();
    let session = AnalyzerSession::new(analyzer);
    let initialized_at = session.initialized_at();
    state.slot.install(session).await;
    info!(replaced, %initialized_at, "스크린 리더 초기화 완료");

    Ok(Json(InitializeResponse {
        status: "initialized",
        message: "AI Screen Reader initialized successfully".to_string(),
        initialized_at,
    }))
}
