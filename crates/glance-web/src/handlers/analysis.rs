//! 분석/설명 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use glance_core::models::analysis::{AnalysisResult, Explanation};

use crate::error::ApiError;
use crate::handlers::optional_json;
use crate::AppState;

/// 상세 분석 응답 (분석 결과 + 식별자)
#[derive(Debug, Serialize)]
pub struct DetailedAnalysisResponse {
    pub analysis_id: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// POST /api/analyze/detailed
pub async fn analyze_detailed(
    State(state): State<AppState>,
) -> Result<Json<DetailedAnalysisResponse>, ApiError> {
    let session = state.slot.current()?;
    let result = session.analyzer().analyze_once(None).await?;

    let analysis_id = Uuid::new_v4().to_string();
    debug!(%analysis_id, commands = result.commands.len(), "상세 분석 응답");

    Ok(Json(DetailedAnalysisResponse {
        analysis_id,
        result,
    }))
}

/// 설명 요청
#[derive(Debug, Default, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub user_intent: Option<String>,
}

/// POST /api/explain
pub async fn explain(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Explanation>, ApiError> {
    let request: ExplainRequest = optional_json(&body)?;
    let session = state.slot.current()?;

    let intent = request.user_intent.unwrap_or_default();
    let explanation = session.analyzer().explain(&intent).await?;
    Ok(Json(explanation))
}
