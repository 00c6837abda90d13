//! 애플리케이션 설정 구조체.
//!
//! 캡처 영역, 비전 전처리/OCR, 멀티모달 LLM, 모니터링 주기, 웹 서버 설정을 정의한다.
//! 모든 필드는 serde 기본값을 가지므로 부분 설정 파일도 로드된다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 화면 캡처 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 비전(전처리/OCR/인코딩) 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 멀티모달 LLM 설정
    #[serde(default)]
    pub llm: LlmConfig,
    /// 백그라운드 모니터링 설정
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// HTTP API 서버 설정
    #[serde(default)]
    pub web: WebConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 대상 영역
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CaptureRegion {
    /// 주 모니터 전체
    #[default]
    FullDisplay,
    /// 제목에 `title`이 포함된 창 (찾지 못하면 전체 화면으로 대체)
    Window {
        /// 대소문자 무시 부분 일치 대상
        title: String,
    },
    /// 주 모니터 기준 고정 사각형
    Rect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// 화면 캡처 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 캡처 영역
    #[serde(default)]
    pub region: CaptureRegion,
}

// ============================================================
// 비전 설정
// ============================================================

/// 모델 전송용 이미지 포맷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG (기본)
    #[default]
    Jpeg,
    /// WebP
    Webp,
}

impl ImageFormat {
    /// MIME 타입
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

/// 비전 설정: 전처리, OCR, 전송 인코딩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// OCR 활성화 여부 (`ocr` feature 미포함 빌드에서는 무시)
    #[serde(default = "default_true")]
    pub ocr_enabled: bool,
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
    /// Tesseract 언어 코드
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// OCR 최소 신뢰도 (엔진 원본 0~100 스케일, 이 값 이하는 버림)
    #[serde(default = "default_min_ocr_confidence")]
    pub min_ocr_confidence: u8,
    /// 전송 이미지 포맷
    #[serde(default)]
    pub image_format: ImageFormat,
    /// 인코딩 품질 (1~100)
    #[serde(default = "default_image_quality")]
    pub image_quality: u8,
    /// 전송 전 최대 너비 (0이면 축소하지 않음)
    #[serde(default = "default_max_upload_width")]
    pub max_upload_width: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            tessdata_path: None,
            ocr_language: default_ocr_language(),
            min_ocr_confidence: default_min_ocr_confidence(),
            image_format: ImageFormat::Jpeg,
            image_quality: default_image_quality(),
            max_upload_width: default_max_upload_width(),
        }
    }
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_min_ocr_confidence() -> u8 {
    30
}

fn default_image_quality() -> u8 {
    85
}

fn default_max_upload_width() -> u32 {
    1920
}

// ============================================================
// LLM 설정
// ============================================================

/// 멀티모달 AI 제공자 타입: 요청/응답 형식 및 인증 헤더 결정
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderType {
    /// Google Gemini: `x-goog-api-key` 헤더 + `:generateContent`
    #[default]
    Gemini,
    /// OpenAI 호환 API: `Authorization: Bearer` 헤더 + `/v1/chat/completions`
    OpenAi,
    /// Anthropic Claude API: `x-api-key` 헤더 + `/v1/messages`
    Anthropic,
}

impl AiProviderType {
    /// 제공자 기본 모델
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-sonnet-4-5-20250929",
        }
    }

    /// 제공자 기본 API 베이스 URL
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }
}

impl std::str::FromStr for AiProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(format!("알 수 없는 제공자: {other}")),
        }
    }
}

/// 멀티모달 LLM 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// 제공자 타입
    #[serde(default)]
    pub provider: AiProviderType,
    /// API 베이스 URL (None이면 제공자 기본값)
    #[serde(default)]
    pub base_url: Option<String>,
    /// 모델 이름 (None이면 제공자 기본값)
    #[serde(default)]
    pub model: Option<String>,
    /// API 키 (비어 있으면 `.env`/환경 변수/요청 본문에서 공급)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    /// 최대 출력 토큰 수
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl LlmConfig {
    /// 실제 사용할 모델 이름
    pub fn resolved_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// 실제 사용할 베이스 URL (끝 슬래시 제거)
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// 요청 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: AiProviderType::Gemini,
            base_url: None,
            model: None,
            api_key: String::new(),
            timeout_secs: default_llm_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_llm_timeout_secs() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    2048
}

// ============================================================
// 모니터링 설정
// ============================================================

/// 백그라운드 모니터링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 요청에 간격이 없을 때 사용할 폴링 간격 (초)
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> f64 {
    2.0
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// HTTP API 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 서버 포트 (기본: 5000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_web_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let json = r#"{"llm": {"provider": "openai"}, "web": {"port": 8080}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.llm.provider, AiProviderType::OpenAi);
        assert_eq!(config.llm.resolved_model(), "gpt-4o-mini");
        assert_eq!(config.web.port, 8080);
        assert!(config.vision.ocr_enabled);
        assert_eq!(config.capture.region, CaptureRegion::FullDisplay);
    }

    #[test]
    fn capture_region_tagged_serde() {
        let json = r#"{"mode": "rect", "x": 10, "y": 20, "width": 300, "height": 200}"#;
        let region: CaptureRegion = serde_json::from_str(json).unwrap();
        assert_eq!(
            region,
            CaptureRegion::Rect {
                x: 10,
                y: 20,
                width: 300,
                height: 200
            }
        );

        let window = CaptureRegion::Window {
            title: "Firefox".to_string(),
        };
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains(r#""mode":"window""#));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = LlmConfig {
            base_url: Some("http://localhost:1234/".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(config.resolved_base_url(), "http://localhost:1234");
    }

    #[test]
    fn provider_from_str() {
        assert_eq!("Gemini".parse::<AiProviderType>(), Ok(AiProviderType::Gemini));
        assert_eq!("claude".parse::<AiProviderType>(), Ok(AiProviderType::Anthropic));
        assert!("mystery".parse::<AiProviderType>().is_err());
    }

    #[test]
    fn api_key_not_serialized_when_empty() {
        let json = serde_json::to_string(&LlmConfig::default()).unwrap();
        assert!(!json.contains("api_key"));
    }
}
