//! # glance-network
//!
//! 멀티모달 LLM HTTP 어댑터.
//! 스크린샷 + 프롬프트를 외부 AI API에 전송하고 응답 텍스트를 꺼낸다.
//! 응답 텍스트의 해석(JSON 파싱, 폴백)은 `glance-analysis`가 담당한다.
//!
//! ```rust,ignore
//! use glance_network::remote_model::RemoteSceneModel;
//!
//! let model = RemoteSceneModel::new(&config.llm)?;
//! let text = model.generate(prompt, &encoded).await?;
//! ```

pub mod remote_model;
