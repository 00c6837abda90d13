//! GLANCE 핵심 에러 타입.
//!
//! 어댑터 crate는 이 타입을 그대로 반환하거나 자체 에러에서 `From<CoreError>`로 변환한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 캡처 실패만 분석 사이클을 중단시킨다. OCR/해석 계열 에러는
/// 각 컴포넌트 경계에서 빈 결과 또는 폴백 값으로 흡수된다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 화면 캡처 백엔드 실패
    #[error("화면 캡처 불가: {0}")]
    CaptureUnavailable(String),

    /// OCR 엔진 없음 또는 실행 실패
    #[error("텍스트 감지 불가: {0}")]
    DetectionUnavailable(String),

    /// 모델 응답이 JSON이 아니거나 기대한 형태가 아님
    #[error("모델 응답 형식 오류: {0}")]
    InterpretationMalformed(String),

    /// 분석기 초기화 전 호출
    #[error("스크린 리더가 초기화되지 않음")]
    NotInitialized,

    /// 네트워크 에러 (연결 실패, 타임아웃, 오류 응답)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 인증 실패 (API 키 거부)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// 호출자 입력 문제로 인한 에러인지 (HTTP 4xx 매핑용)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::Validation { .. })
    }
}
