//! # glance-web
//!
//! GLANCE HTTP API 서버.
//! Axum 기반 REST API. 분석기는 `/api/initialize`로 슬롯에 설치되며
//! 이후 분석, 설명, 모니터링 제어, 통계 조회를 제공한다.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod slot;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use glance_analysis::factory::SharedAnalyzerFactory;
use glance_core::config::{AppConfig, WebConfig};

pub use slot::{AnalyzerSession, AnalyzerSlot};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 초기화된 분석 세션 보관소
    pub slot: AnalyzerSlot,
    /// `/api/initialize`에서 분석기를 만드는 팩토리
    pub factory: SharedAnalyzerFactory,
    /// 애플리케이션 설정 (읽기 전용)
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(factory: SharedAnalyzerFactory, config: AppConfig) -> Self {
        Self {
            slot: AnalyzerSlot::new(),
            factory,
            config: Arc::new(config),
        }
    }
}

/// 라우터 구성 (`/api` 아래 API, JSON 404, CORS, 요청 트레이싱)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP API 서버
pub struct WebServer {
    config: WebConfig,
    host: Option<String>,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config.web.clone(),
            host: None,
            state,
        }
    }

    /// 바인드 호스트 지정 (기본: `allow_external`이면 0.0.0.0, 아니면 127.0.0.1)
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// 포트 지정
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// 공유 상태 (슬롯 사전 설치 등)
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn bind_host(&self) -> &str {
        match &self.host {
            Some(host) => host,
            None if self.config.allow_external => "0.0.0.0",
            None => "127.0.0.1",
        }
    }

    /// 서버 실행
    ///
    /// 기본 포트가 사용 중이면 다음 포트를 순서대로 시도한다 (최대 10개).
    /// 종료 신호를 받으면 모니터링을 중지하고 graceful shutdown 한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = self.bind_host().to_string();
        let slot = self.state.slot.clone();
        let app = build_router(self.state);

        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);
            if port < base_port || (attempt > 0 && port == base_port) {
                break;
            }

            let addr: SocketAddr = match format!("{host}:{port}").parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {host}:{port}: {e}");
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("잘못된 바인드 주소 {host}:{port}"),
                    ));
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                    }
                    info!("GLANCE API 서버 시작: http://{addr}");

                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    slot.clear().await;
                    info!("GLANCE API 서버 종료");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    warn!("포트 {port} 이미 사용 중, 다음 포트 시도");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.bind_host(), self.config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_analysis::analyzer::ScreenAnalyzer;
    use glance_core::error::CoreError;

    fn state() -> AppState {
        let factory: SharedAnalyzerFactory =
            Arc::new(|_key: &str| -> Result<ScreenAnalyzer, CoreError> {
                Err(CoreError::Config("테스트용".to_string()))
            });
        AppState::new(factory, AppConfig::default())
    }

    #[test]
    fn default_url_is_local() {
        let server = WebServer::new(state());
        assert_eq!(server.url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn host_and_port_overrides() {
        let server = WebServer::new(state()).with_host("0.0.0.0").with_port(8080);
        assert_eq!(server.url(), "http://0.0.0.0:8080");
    }

    #[test]
    fn external_access_binds_all_interfaces() {
        let mut config = AppConfig::default();
        config.web.allow_external = true;
        let server = WebServer::new(AppState::new(state().factory, config));
        assert_eq!(server.bind_host(), "0.0.0.0");
    }
}
