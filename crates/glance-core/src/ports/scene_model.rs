//! 멀티모달 모델 포트.
//!
//! 구현: `glance-network::remote_model::RemoteSceneModel` (Gemini, OpenAI 호환, Anthropic)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::EncodedImage;

/// 이미지 + 프롬프트를 받아 모델의 원시 텍스트 응답을 반환한다.
///
/// 응답 내용은 신뢰하지 않는 입력으로 취급하며, 해석은 호출 측에서 한다.
#[async_trait]
pub trait SceneModel: Send + Sync {
    async fn generate(&self, prompt: &str, image: &EncodedImage) -> Result<String, CoreError>;

    /// 제공자/모델 이름
    fn provider_name(&self) -> &str;
}
