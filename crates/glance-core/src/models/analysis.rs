//! 분석 결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::command::SuggestedCommand;
use super::scene::SceneInterpretation;
use super::text::TextFragment;

/// 1회 분석 결과 (호출마다 새로 생성, 불변)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 캡처 시각
    pub timestamp: DateTime<Utc>,
    /// OCR 텍스트 조각 (OCR 불가 시 빈 목록)
    pub elements: Vec<TextFragment>,
    /// 제안 명령
    pub commands: Vec<SuggestedCommand>,
    /// 화면 해석
    pub interpretation: SceneInterpretation,
    /// 모델에 전송한 이미지 (Base64)
    pub screenshot_b64: String,
    /// 요약
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// 결과 조립: 요약은 나머지 필드에서 파생
    pub fn new(
        timestamp: DateTime<Utc>,
        elements: Vec<TextFragment>,
        commands: Vec<SuggestedCommand>,
        interpretation: SceneInterpretation,
        screenshot_b64: String,
    ) -> Self {
        let summary = AnalysisSummary {
            screen_type: interpretation.screen_type.clone(),
            application: interpretation.application_name.clone(),
            context: interpretation.current_context.clone(),
            elements_found: elements.len(),
            commands_generated: commands.len(),
            confidence: interpretation.confidence,
        };
        Self {
            timestamp,
            elements,
            commands,
            interpretation,
            screenshot_b64,
            summary,
        }
    }
}

/// 분석 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub screen_type: String,
    pub application: String,
    pub context: String,
    pub elements_found: usize,
    pub commands_generated: usize,
    /// 해석 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}

/// 화면 설명 결과 (OCR 없이 해석만)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub timestamp: DateTime<Utc>,
    pub explanation: SceneInterpretation,
    pub screenshot_b64: String,
}

/// 분석 통계 (대시보드용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// 완료된 분석 수
    pub total_analyses: u64,
    /// 생성된 제안 명령 수
    pub total_commands: u64,
    /// 실행된 명령 수 (명령 실행 기능이 없으므로 항상 0)
    pub executed_commands: u64,
    /// 최근 1시간 내 분석 수
    pub recent_analyses: u64,
    /// 분석 성공률 (0.0 ~ 1.0, 시도가 없으면 0)
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::command::ActionKind;
    use crate::models::text::BoundingBox;

    fn scene() -> SceneInterpretation {
        SceneInterpretation {
            application_name: "Terminal".to_string(),
            current_context: "빌드 로그 확인".to_string(),
            screen_type: "terminal".to_string(),
            screen_description: String::new(),
            visible_elements: vec![],
            user_workflow: String::new(),
            next_steps: String::new(),
            important_data: String::new(),
            accessibility_notes: String::new(),
            confidence: 0.7,
        }
    }

    #[test]
    fn summary_is_derived() {
        let fragment = TextFragment {
            text: "error".to_string(),
            bbox: BoundingBox {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            confidence: 0.9,
            center: (5, 5),
        };
        let command = SuggestedCommand {
            action_type: ActionKind::Scroll,
            target: "로그".to_string(),
            coordinates: None,
            parameters: serde_json::Map::new(),
            confidence: 0.5,
            explanation: None,
        };
        let result = AnalysisResult::new(
            Utc::now(),
            vec![fragment],
            vec![command.clone(), command],
            scene(),
            "aGVsbG8=".to_string(),
        );
        assert_eq!(result.summary.elements_found, 1);
        assert_eq!(result.summary.commands_generated, 2);
        assert_eq!(result.summary.application, "Terminal");
        assert!((result.summary.confidence - 0.7).abs() < f64::EPSILON);
    }
}
