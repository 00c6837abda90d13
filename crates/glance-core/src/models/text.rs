//! OCR 텍스트 모델.

use serde::{Deserialize, Serialize};

/// 픽셀 단위 바운딩 박스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// 중심점 (정수 나눗셈)
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }
}

/// OCR 엔진이 반환한 원시 단어 (필터 적용 전)
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    /// 인식된 텍스트 (trim 전)
    pub text: String,
    /// 위치
    pub bbox: BoundingBox,
    /// 엔진 원본 신뢰도 (0~100, 인식 실패 시 음수일 수 있음)
    pub confidence: f32,
}

/// 감지된 텍스트 조각 (필터 통과분)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// trim된 텍스트 (비어 있지 않음)
    pub text: String,
    /// 위치
    pub bbox: BoundingBox,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 바운딩 박스 중심
    pub center: (i32, i32),
}

impl TextFragment {
    /// 원시 단어를 조각으로 변환: 신뢰도를 단위 스케일로 환산하고 중심점 계산
    pub fn from_word(word: &OcrWord) -> Self {
        Self {
            text: word.text.trim().to_string(),
            bbox: word.bbox,
            confidence: (f64::from(word.confidence) / 100.0).clamp(0.0, 1.0),
            center: word.bbox.center(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_integer_half_extent() {
        let bbox = BoundingBox {
            x: 10,
            y: 20,
            width: 51,
            height: 15,
        };
        assert_eq!(bbox.center(), (35, 27));
    }

    #[test]
    fn fragment_from_word() {
        let word = OcrWord {
            text: "  Save ".to_string(),
            bbox: BoundingBox {
                x: 100,
                y: 200,
                width: 60,
                height: 20,
            },
            confidence: 92.0,
        };
        let fragment = TextFragment::from_word(&word);
        assert_eq!(fragment.text, "Save");
        assert!((fragment.confidence - 0.92).abs() < 1e-6);
        assert_eq!(fragment.center, (130, 210));
    }
}
