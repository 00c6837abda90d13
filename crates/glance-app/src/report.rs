//! 터미널 출력용 분석 리포트.

use std::fmt::Write;

use glance_core::models::analysis::{AnalysisResult, AnalysisStats};

const RULE_WIDTH: usize = 60;

/// 분석 결과를 사람이 읽는 리포트로 렌더링
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let summary = &result.summary;
    let scene = &result.interpretation;

    let _ = writeln!(out, "LIVE SCREEN ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Application:        {}", summary.application);
    let _ = writeln!(out, "Screen Type:        {}", summary.screen_type);
    let _ = writeln!(out, "Context:            {}", or_dash(&summary.context));
    let _ = writeln!(out, "Elements Found:     {}", summary.elements_found);
    let _ = writeln!(out, "Commands Generated: {}", summary.commands_generated);
    let _ = writeln!(out, "Confidence:         {}", percent(summary.confidence));

    if !scene.screen_description.is_empty() {
        let _ = writeln!(out, "\nDESCRIPTION");
        let _ = writeln!(out, "   {}", scene.screen_description);
    }

    let _ = writeln!(out, "\nDETAILED EXPLANATION");
    let _ = writeln!(out, "   Current Context: {}", or_dash(&scene.current_context));
    let _ = writeln!(out, "   User Workflow:   {}", or_dash(&scene.user_workflow));
    let _ = writeln!(out, "   Next Steps:      {}", or_dash(&scene.next_steps));

    if !scene.visible_elements.is_empty() {
        let _ = writeln!(out, "\nVISIBLE ELEMENTS");
        for (i, element) in scene.visible_elements.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {}. {}: {}",
                i + 1,
                or_dash(&element.element),
                or_dash(&element.content)
            );
            let _ = writeln!(out, "      Purpose:    {}", or_dash(&element.purpose));
            let _ = writeln!(out, "      Importance: {:?}", element.importance);
        }
    }

    if !scene.important_data.is_empty() {
        let _ = writeln!(out, "\nIMPORTANT DATA");
        let _ = writeln!(out, "   {}", scene.important_data);
    }

    if !scene.accessibility_notes.is_empty() {
        let _ = writeln!(out, "\nACCESSIBILITY");
        let _ = writeln!(out, "   {}", scene.accessibility_notes);
    }

    if !result.commands.is_empty() {
        let _ = writeln!(out, "\nSUGGESTED ACTIONS");
        for (i, cmd) in result.commands.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {}. {}: {}",
                i + 1,
                cmd.action_type.as_str().to_uppercase(),
                cmd.target
            );
            if let Some((x, y)) = cmd.coordinates {
                let _ = writeln!(out, "      Coordinates: ({x}, {y})");
            }
            let _ = writeln!(out, "      Confidence:  {}", percent(cmd.confidence));
            if let Some(explanation) = &cmd.explanation {
                let _ = writeln!(out, "      Why:         {explanation}");
            }
        }
    }

    if !result.elements.is_empty() {
        let _ = writeln!(out, "\nOCR TEXT");
        for fragment in &result.elements {
            let _ = writeln!(
                out,
                "   \"{}\" @ ({}, {}) {}",
                fragment.text,
                fragment.center.0,
                fragment.center.1,
                percent(fragment.confidence)
            );
        }
    }

    out
}

/// 모니터링 종료 시 통계 요약
pub fn render_stats(stats: &AnalysisStats) -> String {
    format!(
        "Analyses: {} (recent hour: {}), commands suggested: {}, success rate: {}",
        stats.total_analyses,
        stats.recent_analyses,
        stats.total_commands,
        percent(stats.success_rate)
    )
}

/// 0~1 비율을 백분율 문자열로
fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::models::command::{ActionKind, SuggestedCommand};
    use glance_core::models::scene::SceneInterpretation;

    fn result() -> AnalysisResult {
        let scene = SceneInterpretation {
            application_name: "Firefox".to_string(),
            current_context: "Reading documentation".to_string(),
            screen_type: "browser".to_string(),
            screen_description: String::new(),
            visible_elements: vec![],
            user_workflow: String::new(),
            next_steps: "Open the next page".to_string(),
            important_data: String::new(),
            accessibility_notes: String::new(),
            confidence: 0.875,
        };
        let command = SuggestedCommand {
            action_type: ActionKind::Click,
            target: "Next".to_string(),
            coordinates: Some((1200, 640)),
            parameters: serde_json::Map::new(),
            confidence: 0.8,
            explanation: Some("Continues the guide".to_string()),
        };
        AnalysisResult::new(chrono::Utc::now(), vec![], vec![command], scene, String::new())
    }

    #[test]
    fn report_contains_summary_and_actions() {
        let report = render_analysis(&result());
        assert!(report.contains("Application:        Firefox"));
        assert!(report.contains("Confidence:         88%"));
        assert!(report.contains("1. CLICK: Next"));
        assert!(report.contains("Coordinates: (1200, 640)"));
        assert!(report.contains("User Workflow:   -"));
        assert!(!report.contains("OCR TEXT"));
    }

    #[test]
    fn stats_line() {
        let stats = AnalysisStats {
            total_analyses: 4,
            total_commands: 9,
            executed_commands: 0,
            recent_analyses: 4,
            success_rate: 0.8,
        };
        assert_eq!(
            render_stats(&stats),
            "Analyses: 4 (recent hour: 4), commands suggested: 9, success rate: 80%"
        );
    }
}
