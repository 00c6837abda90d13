//! 외부 멀티모달 LLM 클라이언트.
//!
//! 스크린샷(Base64)과 프롬프트를 함께 전송하고 응답 텍스트를 반환한다.
//!
//! 지원 API:
//! - Gemini: `POST {base}/v1beta/models/{model}:generateContent` (`x-goog-api-key`)
//! - OpenAI 호환: `POST {base}/v1/chat/completions` (`Authorization: Bearer`)
//! - Anthropic: `POST {base}/v1/messages` (`x-api-key`)

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use glance_core::config::{AiProviderType, LlmConfig};
use glance_core::error::CoreError;
use glance_core::models::frame::EncodedImage;
use glance_core::ports::scene_model::SceneModel;

/// Anthropic API 버전 헤더 값
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 오류 응답 본문 로그/메시지에 남길 최대 문자 수
const ERROR_BODY_PREVIEW: usize = 200;

/// 외부 멀티모달 LLM 클라이언트: `SceneModel` 포트 구현
///
/// API 키는 메모리에만 유지하며 로그에 남기지 않는다.
pub struct RemoteSceneModel {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    provider_type: AiProviderType,
    max_output_tokens: u32,
}

impl std::fmt::Debug for RemoteSceneModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSceneModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("provider_type", &self.provider_type)
            .finish_non_exhaustive()
    }
}

impl RemoteSceneModel {
    /// 새 클라이언트 생성: API 키가 비어 있으면 인증 오류
    pub fn new(config: &LlmConfig) -> Result<Self, CoreError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(CoreError::Auth(
                "AI API 키 미설정. GLANCE_API_KEY / GOOGLE_API_KEY 또는 .env를 확인하세요.".into(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {e}")))?;

        let model = config.resolved_model().to_string();
        let base_url = config.resolved_base_url().to_string();

        debug!(
            provider = ?config.provider,
            base_url = %base_url,
            model = %model,
            timeout = config.timeout_secs,
            "RemoteSceneModel 초기화"
        );

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.to_string(),
            model,
            provider_type: config.provider,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// 제공자별 요청 URL
    fn endpoint(&self) -> String {
        match self.provider_type {
            AiProviderType::Gemini => format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ),
            AiProviderType::OpenAi => format!("{}/v1/chat/completions", self.base_url),
            AiProviderType::Anthropic => format!("{}/v1/messages", self.base_url),
        }
    }

    /// 제공자별 요청 본문
    fn request_body(&self, prompt: &str, image: &EncodedImage) -> Value {
        match self.provider_type {
            AiProviderType::Gemini => json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": prompt },
                        {
                            "inline_data": {
                                "mime_type": image.mime_type(),
                                "data": image.data_b64
                            }
                        }
                    ]
                }],
                "generationConfig": {
                    "maxOutputTokens": self.max_output_tokens
                }
            }),
            AiProviderType::OpenAi => json!({
                "model": self.model,
                "max_tokens": self.max_output_tokens,
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{};base64,{}", image.mime_type(), image.data_b64)
                            }
                        }
                    ]
                }]
            }),
            AiProviderType::Anthropic => json!({
                "model": self.model,
                "max_tokens": self.max_output_tokens,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image",
                            "source": {
                                "type": "base64",
                                "media_type": image.mime_type(),
                                "data": image.data_b64
                            }
                        },
                        { "type": "text", "text": prompt }
                    ]
                }]
            }),
        }
    }

    /// 제공자별 응답 텍스트 추출
    fn extract_text(&self, body: &str) -> Result<String, CoreError> {
        match self.provider_type {
            AiProviderType::Gemini => parse_gemini_response(body),
            AiProviderType::OpenAi => parse_openai_response(body),
            AiProviderType::Anthropic => parse_anthropic_response(body),
        }
    }
}

#[async_trait]
impl SceneModel for RemoteSceneModel {
    async fn generate(&self, prompt: &str, image: &EncodedImage) -> Result<String, CoreError> {
        let endpoint = self.endpoint();
        debug!(
            endpoint = %endpoint,
            model = %self.model,
            width = image.width,
            height = image.height,
            "멀티모달 LLM API 호출"
        );

        let mut builder = self
            .http_client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt, image));

        builder = match self.provider_type {
            AiProviderType::Gemini => builder.header("x-goog-api-key", &self.api_key),
            AiProviderType::OpenAi => {
                builder.header("Authorization", format!("Bearer {}", self.api_key))
            }
            AiProviderType::Anthropic => builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("LLM API 호출 실패: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("LLM API 응답 읽기 실패: {e}")))?;

        if !status.is_success() {
            warn!(status = %status, "LLM API 오류 응답");
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(match status.as_u16() {
                401 | 403 => CoreError::Auth(format!("LLM API 인증 실패 ({status}): {preview}")),
                _ => CoreError::Network(format!("LLM API 오류 ({status}): {preview}")),
            });
        }

        let text = self.extract_text(&body)?;
        debug!(chars = text.len(), "LLM 응답 수신");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

fn parse_body(body: &str) -> Result<Value, CoreError> {
    serde_json::from_str(body)
        .map_err(|e| CoreError::Network(format!("LLM 응답 JSON 파싱 실패: {e}")))
}

/// Gemini 응답: `candidates[0].content.parts[*].text` 이어 붙이기
pub fn parse_gemini_response(body: &str) -> Result<String, CoreError> {
    let response = parse_body(body)?;

    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|cand| cand.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(|r| r.as_str())
                .unwrap_or("후보 없음");
            CoreError::Network(format!("Gemini 응답에서 텍스트를 찾을 수 없음 ({reason})"))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(CoreError::Network(
            "Gemini 응답 텍스트가 비어 있음".to_string(),
        ));
    }
    Ok(text)
}

/// OpenAI 응답: `choices[0].message.content`
pub fn parse_openai_response(body: &str) -> Result<String, CoreError> {
    let response = parse_body(body)?;

    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Network("OpenAI 응답에서 텍스트를 찾을 수 없음".to_string()))
}

/// Anthropic 응답: `content[*]` 중 text 블록 이어 붙이기
pub fn parse_anthropic_response(body: &str) -> Result<String, CoreError> {
    let response = parse_body(body)?;

    let blocks = response
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| CoreError::Network("Claude 응답에서 content를 찾을 수 없음".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(CoreError::Network(
            "Claude 응답에서 텍스트를 찾을 수 없음".to_string(),
        ));
    }
    Ok(text)
}

// ============================================================
// 테스트
// ============================================================
