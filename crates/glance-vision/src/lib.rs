//! # glance-vision
//!
//! 클라이언트 사이드 이미지 파이프라인.
//! 스크린 캡처, OCR용 전처리, 텍스트 감지, 모델 전송용 리사이즈/인코딩을 담당한다.

pub mod capture;
pub mod encoder;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod preprocess;
pub mod resize;
pub mod text_detector;
pub mod tsv;
