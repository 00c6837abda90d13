//! 모니터링 시작/중지 핸들러.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::optional_json;
use crate::AppState;

/// 모니터링 시작 요청
#[derive(Debug, Default, Deserialize)]
pub struct StartMonitorRequest {
    /// 주기 (초, 기본값은 설정의 `monitor.default_interval_secs`)
    #[serde(default)]
    pub interval: Option<f64>,
}

/// 모니터링 시작 응답
#[derive(Debug, Serialize)]
pub struct StartMonitorResponse {
    pub status: &'static str,
    pub interval: f64,
    pub message: String,
}

/// 모니터링 중지 응답
#[derive(Debug, Serialize)]
pub struct StopMonitorResponse {
    pub status: &'static str,
    pub message: String,
}

/// POST /api/monitor/start
pub async fn start_monitoring(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartMonitorResponse>, ApiError> {
    let request: StartMonitorRequest = optional_json(&body)?;
    let session = state.slot.current()?;

    let interval = request
        .interval
        .unwrap_or(state.config.monitor.default_interval_secs);
    let started = session.monitor().start(interval).await?;

    let message = if started {
        format!("Screen monitoring started with {interval}s interval")
    } else {
        "Screen monitoring is already running".to_string()
    };

    Ok(Json(StartMonitorResponse {
        status: "monitoring_started",
        interval,
        message,
    }))
}

/// POST /api/monitor/stop
pub async fn stop_monitoring(
    State(state): State<AppState>,
) -> Result<Json<StopMonitorResponse>, ApiError> {
    let session = state.slot.current()?;
    let was_running = session.monitor().stop().await;

    let message = if was_running {
        "Screen monitoring stopped"
    } else {
        "Screen monitoring was not running"
    };

    Ok(Json(StopMonitorResponse {
        status: "monitoring_stopped",
        message: message.to_string(),
    }))
}
