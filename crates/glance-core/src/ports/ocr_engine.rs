//! OCR 엔진 포트.
//!
//! 구현: `TesseractEngine` (`ocr` feature), `NoopOcrEngine` (항상 빈 결과)

use crate::error::CoreError;
use crate::models::frame::PreprocessedFrame;
use crate::models::text::OcrWord;

/// OCR 엔진: 전처리된 프레임에서 단어 + 바운딩 박스 + 신뢰도 추출
///
/// 필터링(최소 신뢰도, 빈 텍스트)은 호출 측 `TextDetector`가 담당한다.
pub trait OcrEngine: Send + Sync {
    /// 단어 단위 인식 결과 (엔진 원본 신뢰도 0~100)
    fn recognize(&self, frame: &PreprocessedFrame) -> Result<Vec<OcrWord>, CoreError>;

    /// 엔진 이름 (예: "tesseract", "noop")
    fn engine_name(&self) -> &str;
}
