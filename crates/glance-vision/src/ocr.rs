//! Tesseract OCR 엔진.
//!
//! `leptess` 기반. `ocr` feature flag 활성화 시에만 빌드된다.
//! 전처리된 이진 이미지를 PNG로 넘기고 TSV 출력에서 단어 박스를 얻는다.

use std::io::Cursor;
use std::path::PathBuf;

use glance_core::error::CoreError;
use glance_core::models::frame::PreprocessedFrame;
use glance_core::models::text::OcrWord;
use glance_core::ports::ocr_engine::OcrEngine;
use tracing::debug;

use crate::tsv;

/// Tesseract OCR 엔진: `OcrEngine` 포트 구현
///
/// `LepTess` 핸들은 `Send`가 아니므로 호출마다 새로 만든다.
pub struct TesseractEngine {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
    /// 언어 코드 (예: "eng", "kor+eng")
    language: String,
}

impl TesseractEngine {
    /// 새 엔진 생성
    pub fn new(tessdata_path: Option<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tessdata_path,
            language: language.into(),
        }
    }

    /// 사용할 언어 코드
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, frame: &PreprocessedFrame) -> Result<Vec<OcrWord>, CoreError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let mut png = Vec::new();
        frame
            .image()
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| CoreError::DetectionUnavailable(format!("PNG 인코딩 실패: {e}")))?;

        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());

        let mut lt = leptess::LepTess::new(tessdata.as_deref(), &self.language)
            .map_err(|e| CoreError::DetectionUnavailable(format!("OCR 초기화 실패: {e}")))?;

        lt.set_image_from_mem(&png)
            .map_err(|e| CoreError::DetectionUnavailable(format!("OCR 이미지 설정 실패: {e}")))?;

        let tsv_text = lt
            .get_tsv_text(0)
            .map_err(|e| CoreError::DetectionUnavailable(format!("OCR 텍스트 추출 실패: {e}")))?;

        let words = tsv::parse_words(&tsv_text);
        debug!(
            "Tesseract 인식: {}x{} → {}개 단어",
            frame.width(),
            frame.height(),
            words.len()
        );
        Ok(words)
    }

    fn engine_name(&self) -> &str {
        "tesseract"
    }
}
