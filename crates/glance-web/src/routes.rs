//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성 (`/api` 아래에 중첩)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/initialize", post(handlers::session::initialize))
        // 분석
        .route(
            "/analyze/detailed",
            post(handlers::analysis::analyze_detailed),
        )
        .route("/explain", post(handlers::analysis::explain))
        // 모니터링
        .route("/monitor/start", post(handlers::monitor::start_monitoring))
        .route("/monitor/stop", post(handlers::monitor::stop_monitoring))
        // 통계
        .route("/dashboard/stats", get(handlers::stats::dashboard_stats))
}
