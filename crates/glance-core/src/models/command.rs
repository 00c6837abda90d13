//! 제안 명령 모델.
//!
//! 모델이 제안한 상호작용(클릭/입력/스크롤 등). 실제로 실행하지는 않는다.

use serde::{Deserialize, Serialize};

/// 액션 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Click,
    Type,
    Scroll,
    Navigate,
    /// 인식하지 못한 값
    #[default]
    #[serde(other)]
    Unknown,
}

impl ActionKind {
    /// 모델이 준 문자열을 해석 (공백, 대소문자 무시)
    ///
    /// 정확한 이름만 인식한다. `double_click`처럼 비슷한 값도 `Unknown`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "click" => Self::Click,
            "type" => Self::Type,
            "scroll" => Self::Scroll,
            "navigate" => Self::Navigate,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Type => "type",
            Self::Scroll => "scroll",
            Self::Navigate => "navigate",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 제안 명령
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedCommand {
    /// 액션 종류
    pub action_type: ActionKind,
    /// 대상 설명
    pub target: String,
    /// 화면 좌표: 모델이 위치를 주지 않았으면 None (0으로 채우지 않음)
    pub coordinates: Option<(i32, i32)>,
    /// 추가 파라미터
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 모델이 제시한 근거
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
