//! 어댑터 조립.
//!
//! 설정 + API 키 → 캡처/OCR/모델 어댑터를 묶은 `ScreenAnalyzer`.

use std::sync::Arc;

use glance_analysis::analyzer::ScreenAnalyzer;
use glance_analysis::factory::AnalyzerFactory;
use glance_core::config::{AppConfig, VisionConfig};
use glance_core::error::CoreError;
use glance_core::ports::ocr_engine::OcrEngine;
use glance_network::remote_model::RemoteSceneModel;
use glance_vision::capture::ScreenCapture;
use glance_vision::text_detector::NoopOcrEngine;

/// 실제 어댑터를 쓰는 분석기 팩토리
pub struct DefaultAnalyzerFactory {
    config: AppConfig,
}

impl DefaultAnalyzerFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl AnalyzerFactory for DefaultAnalyzerFactory {
    fn build(&self, api_key: &str) -> Result<ScreenAnalyzer, CoreError> {
        let mut llm = self.config.llm.clone();
        llm.api_key = api_key.to_string();

        let model = Arc::new(RemoteSceneModel::new(&llm)?);
        let source = Arc::new(ScreenCapture::new(self.config.capture.region.clone()));
        let ocr = ocr_engine(&self.config.vision);

        Ok(ScreenAnalyzer::new(
            source,
            ocr,
            model,
            self.config.vision.clone(),
        ))
    }
}

#[cfg(feature = "ocr")]
fn ocr_engine(vision: &VisionConfig) -> Arc<dyn OcrEngine> {
    if !vision.ocr_enabled {
        return Arc::new(NoopOcrEngine);
    }
    Arc::new(glance_vision::ocr::TesseractEngine::new(
        vision.tessdata_path.clone(),
        vision.ocr_language.clone(),
    ))
}

#[cfg(not(feature = "ocr"))]
fn ocr_engine(vision: &VisionConfig) -> Arc<dyn OcrEngine> {
    if vision.ocr_enabled {
        tracing::debug!("ocr feature 미포함 빌드, 텍스트 감지 비활성");
    }
    Arc::new(NoopOcrEngine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let factory = DefaultAnalyzerFactory::new(AppConfig::default());
        assert!(matches!(factory.build(""), Err(CoreError::Auth(_))));
    }

    #[test]
    fn builds_with_key() {
        let factory = DefaultAnalyzerFactory::new(AppConfig::default());
        let analyzer = factory.build("test-key").unwrap();
        assert!(analyzer.last_interpretation().is_none());
    }

    #[test]
    fn disabled_ocr_uses_noop() {
        let vision = VisionConfig {
            ocr_enabled: false,
            ..VisionConfig::default()
        };
        assert_eq!(ocr_engine(&vision).engine_name(), "noop");
    }
}
