//! 분석기 생성 주입 지점.
//!
//! HTTP `/api/initialize`와 CLI는 API 키만 알고, 어떤 캡처/OCR/모델 어댑터를
//! 쓸지는 바이너리가 주입한 팩토리가 결정한다.

use std::sync::Arc;

use glance_core::error::CoreError;

use crate::analyzer::ScreenAnalyzer;

/// API 키로 분석기를 만드는 팩토리
pub trait AnalyzerFactory: Send + Sync {
    fn build(&self, api_key: &str) -> Result<ScreenAnalyzer, CoreError>;
}

impl<F> AnalyzerFactory for F
where
    F: Fn(&str) -> Result<ScreenAnalyzer, CoreError> + Send + Sync,
{
    fn build(&self, api_key: &str) -> Result<ScreenAnalyzer, CoreError> {
        self(api_key)
    }
}

/// 공유 가능한 팩토리 핸들
pub type SharedAnalyzerFactory = Arc<dyn AnalyzerFactory>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::{FakeModel, FakeOcr, FakeScreen, ONE_CLICK};
    use glance_core::config::VisionConfig;

    #[test]
    fn closures_are_factories() {
        let factory: SharedAnalyzerFactory = Arc::new(|key: &str| {
            if key.is_empty() {
                return Err(CoreError::Auth("빈 키".to_string()));
            }
            Ok(ScreenAnalyzer::new(
                Arc::new(FakeScreen::new(8, 8)),
                Arc::new(FakeOcr::new(false)),
                Arc::new(FakeModel::new(ONE_CLICK)),
                VisionConfig::default(),
            ))
        });

        assert!(factory.build("key").is_ok());
        assert!(matches!(factory.build(""), Err(CoreError::Auth(_))));
    }
}
