//! 화면 해석 모델.

use serde::{Deserialize, Serialize};

/// 요소 중요도
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    /// 모델이 준 문자열을 해석: 인식하지 못하면 `Medium`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// 화면에 보이는 UI 요소 설명
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// 요소 종류 (Button/Text/Input 등)
    pub element: String,
    /// 표시 내용
    pub content: String,
    /// 존재 이유
    pub purpose: String,
    /// 중요도
    pub importance: Importance,
}

/// 화면 해석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInterpretation {
    /// 앱/웹사이트 이름
    pub application_name: String,
    /// 사용자가 현재 하고 있는 일
    pub current_context: String,
    /// 화면 유형 (login_page, dashboard 등)
    pub screen_type: String,
    /// 화면 전체 설명
    #[serde(default)]
    pub screen_description: String,
    /// 보이는 요소 (모델이 준 순서 유지)
    pub visible_elements: Vec<ElementDescriptor>,
    /// 추정 작업 흐름
    pub user_workflow: String,
    /// 다음에 할 만한 일
    pub next_steps: String,
    /// 화면의 주요 데이터
    pub important_data: String,
    /// 접근성 메모
    #[serde(default)]
    pub accessibility_notes: String,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}
