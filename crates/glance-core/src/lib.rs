//! # glance-core
//!
//! GLANCE 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (캡처, OCR, 멀티모달 모델)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)
//! - [`credentials`]: API 키 조회 (`.env` 파일, 환경 변수)

pub mod config;
pub mod config_manager;
pub mod credentials;
pub mod error;
pub mod models;
pub mod ports;
