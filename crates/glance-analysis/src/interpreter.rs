//! 장면 해석기.
//!
//! 모델의 원시 텍스트 응답을 신뢰하지 않는 입력으로 취급한다.
//! 파싱은 전함수(total)이며, 어떤 입력에도 명령 목록과 해석을 돌려준다.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use glance_core::error::CoreError;
use glance_core::models::command::{ActionKind, SuggestedCommand};
use glance_core::models::frame::EncodedImage;
use glance_core::models::scene::{ElementDescriptor, Importance, SceneInterpretation};
use glance_core::models::text::TextFragment;
use glance_core::ports::scene_model::SceneModel;

use crate::prompts;

/// 명령/해석 필드 누락 시 기본 신뢰도
const DEFAULT_CONFIDENCE: f64 = 0.5;
const DEFAULT_TARGET: &str = "Unknown target";
const DEFAULT_APPLICATION: &str = "Unknown";
const DEFAULT_SCREEN_TYPE: &str = "unknown";
/// 인식하지 못한 액션 이름을 보존하는 파라미터 키
pub const REQUESTED_ACTION_KEY: &str = "requested_action";

/// 폴백 해석의 맥락 문구
pub const FALLBACK_CONTEXT: &str = "Screen analysis completed with basic OCR detection";

/// 해석 결과
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub commands: Vec<SuggestedCommand>,
    pub interpretation: SceneInterpretation,
    /// 폴백 값으로 대체되었는지
    pub degraded: bool,
}

impl SceneDescription {
    /// 고정 폴백 결과
    pub fn fallback() -> Self {
        Self {
            commands: fallback_commands(),
            interpretation: fallback_interpretation(),
            degraded: true,
        }
    }
}

/// 장면 해석기: `SceneModel` 포트 위의 프롬프트/정규화 계층
#[derive(Clone)]
pub struct SceneInterpreter {
    model: Arc<dyn SceneModel>,
}

impl SceneInterpreter {
    pub fn new(model: Arc<dyn SceneModel>) -> Self {
        Self { model }
    }

    /// 모델 이름
    pub fn provider_name(&self) -> &str {
        self.model.provider_name()
    }

    /// 이미지를 해석해 명령과 장면 설명을 반환 (실패하지 않음)
    pub async fn describe(
        &self,
        image: &EncodedImage,
        hint: Option<&str>,
        fragments: &[TextFragment],
    ) -> SceneDescription {
        let prompt = prompts::scene_prompt(hint, fragments);

        let raw = match self.model.generate(&prompt, image).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(provider = %self.model.provider_name(), "모델 호출 실패, 폴백 사용: {e}");
                return SceneDescription::fallback();
            }
        };

        match parse_response(&raw) {
            Ok(description) => {
                debug!(
                    commands = description.commands.len(),
                    elements = description.interpretation.visible_elements.len(),
                    screen_type = %description.interpretation.screen_type,
                    "모델 응답 해석 완료"
                );
                description
            }
            Err(e) => {
                let preview: String = raw.chars().take(200).collect();
                warn!("모델 응답 해석 실패, 폴백 사용: {e} (raw: {preview})");
                SceneDescription::fallback()
            }
        }
    }
}

/// 코드 펜스 제거: 앞쪽 ```` ``` ````(언어 태그 포함) 줄과 뒤쪽 ```` ``` ````
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            // 한 줄짜리 펜스: 언어 태그만 떼어냄
            None => rest.strip_prefix("json").unwrap_or(rest),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// 모델 응답 텍스트 → 해석 결과
///
/// 펜스 제거 후 JSON 파싱, 실패하면 첫 `{`부터 마지막 `}`까지 다시 시도한다.
/// 최상위가 객체가 아니면 `InterpretationMalformed`.
pub fn parse_response(raw: &str) -> Result<SceneDescription, CoreError> {
    let cleaned = strip_code_fence(raw);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(first_err) => {
            let braced = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if start < end => &cleaned[start..=end],
                _ => {
                    return Err(CoreError::InterpretationMalformed(format!(
                        "JSON 파싱 실패: {first_err}"
                    )))
                }
            };
            serde_json::from_str(braced).map_err(|e| {
                CoreError::InterpretationMalformed(format!("JSON 파싱 실패: {e}"))
            })?
        }
    };

    let Value::Object(root) = value else {
        return Err(CoreError::InterpretationMalformed(
            "최상위 값이 객체가 아님".to_string(),
        ));
    };

    let commands = root
        .get("suggested_actions")
        .and_then(Value::as_array)
        .map(|actions| actions.iter().map(command_from_value).collect())
        .unwrap_or_default();

    Ok(SceneDescription {
        commands,
        interpretation: interpretation_from_map(&root),
        degraded: false,
    })
}

fn command_from_value(value: &Value) -> SuggestedCommand {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    let requested = obj
        .get("action_type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let action_type = requested.map(ActionKind::parse_lenient).unwrap_or_default();

    let mut parameters = obj
        .get("parameters")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    // Unknown으로 떨어진 액션은 원래 이름을 남겨 둔다
    if let (ActionKind::Unknown, Some(raw)) = (action_type, requested) {
        parameters
            .entry(REQUESTED_ACTION_KEY)
            .or_insert_with(|| Value::from(raw));
    }

    SuggestedCommand {
        action_type,
        target: scalar_text(obj.get("target")).unwrap_or_else(|| DEFAULT_TARGET.to_string()),
        coordinates: obj.get("coordinates").and_then(coordinates_from_value),
        parameters,
        confidence: confidence_from_value(obj.get("confidence")),
        explanation: obj
            .get("explanation")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn interpretation_from_map(root: &Map<String, Value>) -> SceneInterpretation {
    let text = |key: &str| flexible_text(root.get(key)).unwrap_or_default();

    SceneInterpretation {
        application_name: flexible_text(root.get("application_name"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_APPLICATION.to_string()),
        current_context: flexible_text(root.get("current_context"))
            .or_else(|| flexible_text(root.get("context")))
            .unwrap_or_default(),
        screen_type: flexible_text(root.get("screen_type"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCREEN_TYPE.to_string()),
        screen_description: text("screen_description"),
        visible_elements: root
            .get("visible_elements")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(element_from_value).collect())
            .unwrap_or_default(),
        user_workflow: text("user_workflow"),
        next_steps: text("next_steps"),
        important_data: text("important_data"),
        accessibility_notes: text("accessibility_notes"),
        confidence: confidence_from_value(root.get("confidence")),
    }
}

fn element_from_value(value: &Value) -> Option<ElementDescriptor> {
    let obj = value.as_object()?;
    let text = |key: &str| flexible_text(obj.get(key)).unwrap_or_default();

    Some(ElementDescriptor {
        element: text("element"),
        content: text("content"),
        purpose: text("purpose"),
        importance: obj
            .get("importance")
            .and_then(Value::as_str)
            .map(Importance::parse_lenient)
            .unwrap_or_default(),
    })
}

/// 문자열/숫자/불리언 → 문자열 (null, 배열, 객체는 None)
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `scalar_text` + 문자열 배열은 "; "로 이어 붙임
fn flexible_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| scalar_text(Some(item)))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => scalar_text(Some(other)),
    }
}

/// `[x, y]` 또는 `{"x": .., "y": ..}` → 정수 좌표
fn coordinates_from_value(value: &Value) -> Option<(i32, i32)> {
    let (x, y) = match value {
        Value::Array(items) if items.len() >= 2 => (items[0].as_f64()?, items[1].as_f64()?),
        Value::Object(obj) => (obj.get("x")?.as_f64()?, obj.get("y")?.as_f64()?),
        _ => return None,
    };
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x.round() as i32, y.round() as i32))
}

/// 신뢰도 정규화: (1, 100] 구간은 백분율로 보고 [0, 1]로 클램프
fn confidence_from_value(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() => normalize_confidence(v),
        _ => DEFAULT_CONFIDENCE,
    }
}

pub fn normalize_confidence(value: f64) -> f64 {
    let scaled = if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    };
    scaled.clamp(0.0, 1.0)
}

/// 고정 폴백 명령 (모델 응답을 쓸 수 없을 때)
pub fn fallback_commands() -> Vec<SuggestedCommand> {
    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    vec![
        SuggestedCommand {
            action_type: ActionKind::Click,
            target: "Primary action button".to_string(),
            coordinates: Some((400, 300)),
            parameters: params(&[("button_text", Value::from("Action"))]),
            confidence: 0.75,
            explanation: None,
        },
        SuggestedCommand {
            action_type: ActionKind::Type,
            target: "Input field".to_string(),
            coordinates: Some((300, 200)),
            parameters: params(&[
                ("text", Value::from("input")),
                ("field_type", Value::from("text")),
            ]),
            confidence: 0.70,
            explanation: None,
        },
        SuggestedCommand {
            action_type: ActionKind::Scroll,
            target: "Page content".to_string(),
            coordinates: None,
            parameters: params(&[
                ("direction", Value::from("down")),
                ("amount", Value::from(3)),
            ]),
            confidence: 0.65,
            explanation: None,
        },
    ]
}

/// 고정 폴백 해석
pub fn fallback_interpretation() -> SceneInterpretation {
    SceneInterpretation {
        application_name: DEFAULT_APPLICATION.to_string(),
        current_context: FALLBACK_CONTEXT.to_string(),
        screen_type: DEFAULT_SCREEN_TYPE.to_string(),
        screen_description: String::new(),
        visible_elements: Vec::new(),
        user_workflow: String::new(),
        next_steps: String::new(),
        important_data: String::new(),
        accessibility_notes: String::new(),
        confidence: 0.60,
    }
}

// ============================================================
// 테스트
// ============================================================
