//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate(`glance-vision`, `glance-network`)가 이 trait들을 구현하며,
//! `glance-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 캡처와 OCR은 블로킹 호출이므로 동기 trait이고, 호출자가 `spawn_blocking`으로 실행한다.
//! 모델 호출은 `async_trait`으로 object safety를 보장한다.

pub mod frame_source;
pub mod ocr_engine;
pub mod scene_model;
