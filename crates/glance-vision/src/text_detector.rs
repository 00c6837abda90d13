//! 텍스트 감지기.
//!
//! OCR 엔진 결과에 최소 신뢰도 / 빈 텍스트 필터를 적용한다.
//! 엔진 오류는 빈 결과로 흡수한다 (분석은 OCR 없이 계속 진행).

use std::sync::Arc;

use glance_core::error::CoreError;
use glance_core::models::frame::PreprocessedFrame;
use glance_core::models::text::{OcrWord, TextFragment};
use glance_core::ports::ocr_engine::OcrEngine;
use tracing::{debug, warn};

/// OCR 비활성 엔진: 항상 빈 결과
pub struct NoopOcrEngine;

impl OcrEngine for NoopOcrEngine {
    fn recognize(&self, _frame: &PreprocessedFrame) -> Result<Vec<OcrWord>, CoreError> {
        Ok(Vec::new())
    }

    fn engine_name(&self) -> &str {
        "noop"
    }
}

/// 텍스트 감지기
#[derive(Clone)]
pub struct TextDetector {
    engine: Arc<dyn OcrEngine>,
    /// 엔진 원본 스케일(0~100) 최소 신뢰도: 이 값을 초과해야 통과
    min_confidence: u8,
}

impl TextDetector {
    pub fn new(engine: Arc<dyn OcrEngine>, min_confidence: u8) -> Self {
        Self {
            engine,
            min_confidence,
        }
    }

    /// 사용 중인 엔진 이름
    pub fn engine_name(&self) -> &str {
        self.engine.engine_name()
    }

    /// 텍스트 조각 감지: 엔진 순서 유지, 실패 시 빈 목록
    pub fn detect(&self, frame: &PreprocessedFrame) -> Vec<TextFragment> {
        let words = match self.engine.recognize(frame) {
            Ok(words) => words,
            Err(e) => {
                warn!("텍스트 감지 실패 ({}): {e}", self.engine.engine_name());
                return Vec::new();
            }
        };

        let total = words.len();
        let threshold = f32::from(self.min_confidence);
        let fragments: Vec<TextFragment> = words
            .iter()
            .filter(|w| w.confidence > threshold && !w.text.trim().is_empty())
            .map(TextFragment::from_word)
            .collect();

        debug!(
            "텍스트 감지: {}개 중 {}개 통과 (임계값 {})",
            total,
            fragments.len(),
            self.min_confidence
        );
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::models::text::BoundingBox;
    use image::GrayImage;

    struct FixedEngine(Vec<OcrWord>);

    impl OcrEngine for FixedEngine {
        fn recognize(&self, _frame: &PreprocessedFrame) -> Result<Vec<OcrWord>, CoreError> {
            Ok(self.0.clone())
        }

        fn engine_name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenEngine;

    impl OcrEngine for BrokenEngine {
        fn recognize(&self, _frame: &PreprocessedFrame) -> Result<Vec<OcrWord>, CoreError> {
            Err(CoreError::DetectionUnavailable("tesseract 없음".to_string()))
        }

        fn engine_name(&self) -> &str {
            "broken"
        }
    }

    fn word(text: &str, confidence: f32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            bbox: BoundingBox {
                x: 10,
                y: 20,
                width: 40,
                height: 10,
            },
            confidence,
        }
    }

    fn frame() -> PreprocessedFrame {
        PreprocessedFrame::new(GrayImage::new(4, 4))
    }

    #[test]
    fn filters_low_confidence_and_blank_words() {
        let engine = FixedEngine(vec![
            word(" Submit ", 91.0),
            word("noise", 30.0),
            word("   ", 99.0),
            word("Cancel", 30.5),
            word("", -1.0),
        ]);
        let detector = TextDetector::new(Arc::new(engine), 30);

        let fragments = detector.detect(&frame());
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Submit");
        assert!((fragments[0].confidence - 0.91).abs() < 1e-6);
        assert_eq!(fragments[0].center, (30, 25));
        assert_eq!(fragments[1].text, "Cancel");
    }

    #[test]
    fn engine_failure_yields_empty() {
        let detector = TextDetector::new(Arc::new(BrokenEngine), 30);
        assert!(detector.detect(&frame()).is_empty());
    }

    #[test]
    fn noop_engine_yields_empty() {
        let detector = TextDetector::new(Arc::new(NoopOcrEngine), 0);
        assert!(detector.detect(&frame()).is_empty());
        assert_eq!(detector.engine_name(), "noop");
    }
}
