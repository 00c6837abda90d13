//! 대시보드 통계 핸들러.

use axum::extract::State;
use axum::Json;

use glance_core::models::analysis::AnalysisStats;

use crate::AppState;

/// GET /api/dashboard/stats: 초기화 전에는 모두 0
pub async fn dashboard_stats(State(state): State<AppState>) -> Json<AnalysisStats> {
    let stats = state
        .slot
        .current()
        .map(|session| session.analyzer().stats())
        .unwrap_or_default();
    Json(stats)
}
