//! 분석기 슬롯.
//!
//! `/api/initialize` 전에는 비어 있고, 초기화되면 분석기 + 모니터 세션을 담는다.
//! 전역 상태 대신 axum `State`로 주입된다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use glance_analysis::analyzer::ScreenAnalyzer;
use glance_analysis::monitor::ScreenMonitor;
use glance_core::error::CoreError;

/// 초기화된 분석 세션
pub struct AnalyzerSession {
    analyzer: Arc<ScreenAnalyzer>,
    monitor: ScreenMonitor,
    initialized_at: DateTime<Utc>,
}

impl AnalyzerSession {
    pub fn new(analyzer: ScreenAnalyzer) -> Self {
        let analyzer = Arc::new(analyzer);
        Self {
            monitor: ScreenMonitor::new(Arc::clone(&analyzer)),
            analyzer,
            initialized_at: Utc::now(),
        }
    }

    pub fn analyzer(&self) -> &Arc<ScreenAnalyzer> {
        &self.analyzer
    }

    pub fn monitor(&self) -> &ScreenMonitor {
        &self.monitor
    }

    pub fn initialized_at(&self) -> DateTime<Utc> {
        self.initialized_at
    }
}

/// 선택적 분석 세션 보관소 (복제 시 같은 슬롯 공유)
#[derive(Clone, Default)]
pub struct AnalyzerSlot {
    inner: Arc<RwLock<Option<Arc<AnalyzerSession>>>>,
}

impl AnalyzerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 세션: 없으면 `NotInitialized`
    pub fn current(&self) -> Result<Arc<AnalyzerSession>, CoreError> {
        self.inner.read().clone().ok_or(CoreError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().is_some()
    }

    /// 새 세션 설치: 이전 세션의 모니터는 중지 완료 후 반환
    pub async fn install(&self, session: AnalyzerSession) -> Arc<AnalyzerSession> {
        let session = Arc::new(session);
        let previous = self.inner.write().replace(Arc::clone(&session));

        if let Some(previous) = previous {
            if previous.monitor().stop().await {
                info!("재초기화로 이전 모니터링 중지");
            }
        }
        session
    }

    /// 세션 제거 (모니터 중지 포함)
    pub async fn clear(&self) {
        let previous = self.inner.write().take();
        if let Some(previous) = previous {
            previous.monitor().stop().await;
        }
    }
}
