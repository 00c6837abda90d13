//! 멀티모달 모델 프롬프트.

use std::fmt::Write;

use glance_core::models::text::TextFragment;

/// 프롬프트에 포함할 최대 OCR 조각 수
pub const MAX_PROMPT_FRAGMENTS: usize = 40;

/// 힌트가 없을 때의 기본 의도
pub const DEFAULT_INTENT: &str = "General screen analysis";

const SCENE_PROMPT: &str = r#"You are an expert UI/UX analyst looking at a live screen capture.
Explain what the user is seeing as if to someone who cannot see the screen, and suggest
concrete actions they could take next.

Respond with JSON only, using exactly this structure:
{
    "application_name": "Name of the app/website",
    "current_context": "What the user is currently doing",
    "screen_type": "login_page/dashboard/form/settings/editor/etc",
    "screen_description": "Detailed description of what is on the screen",
    "visible_elements": [
        {
            "element": "Button/Text/Input/Image/Menu/etc",
            "content": "What it says or shows",
            "purpose": "Why it is there",
            "importance": "high/medium/low"
        }
    ],
    "user_workflow": "What the user is trying to accomplish",
    "next_steps": "What the user might want to do next",
    "important_data": "Any key information visible",
    "accessibility_notes": "Any accessibility considerations",
    "suggested_actions": [
        {
            "action_type": "click/type/scroll/navigate",
            "target": "What to interact with",
            "coordinates": [x, y],
            "parameters": {"additional_info": "value"},
            "confidence": 0.85,
            "explanation": "Why this action makes sense"
        }
    ],
    "confidence": 0.90
}

Coordinates are pixel positions in the attached image. Omit "coordinates" when the
target has no single clickable point. Confidence values are between 0 and 1."#;

/// 장면 해석 프롬프트 구성
///
/// 고정 스키마 뒤에 사용자 의도와 (있다면) OCR 조각을 보조 맥락으로 덧붙인다.
pub fn scene_prompt(hint: Option<&str>, fragments: &[TextFragment]) -> String {
    let intent = hint
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(DEFAULT_INTENT);

    let mut prompt = String::with_capacity(SCENE_PROMPT.len() + 256);
    prompt.push_str(SCENE_PROMPT);
    let _ = write!(prompt, "\n\nUser intent: {intent}\n");

    if !fragments.is_empty() {
        prompt.push_str("\nText detected by OCR (text @ center x,y):\n");
        for fragment in fragments.iter().take(MAX_PROMPT_FRAGMENTS) {
            let _ = writeln!(
                prompt,
                "- \"{}\" @ {},{}",
                fragment.text, fragment.center.0, fragment.center.1
            );
        }
        if fragments.len() > MAX_PROMPT_FRAGMENTS {
            let _ = writeln!(
                prompt,
                "- ... {} more",
                fragments.len() - MAX_PROMPT_FRAGMENTS
            );
        }
    }

    prompt
}
