//! # glance-analysis
//!
//! 화면 해석 파이프라인.
//!
//! - [`interpreter::SceneInterpreter`]: 프롬프트 구성 → 모델 호출 → 응답 정규화 (실패 시 폴백)
//! - [`analyzer::ScreenAnalyzer`]: 캡처 → 전처리/OCR → 인코딩 → 해석 오케스트레이션
//! - [`monitor::ScreenMonitor`]: 백그라운드 주기 분석 루프 (시작/중지)
//! - [`factory::AnalyzerFactory`]: API 키로 분석기를 만드는 주입 지점

pub mod analyzer;
pub mod factory;
pub mod interpreter;
pub mod monitor;
pub mod prompts;
pub mod stats;
