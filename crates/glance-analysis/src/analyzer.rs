//! 분석 오케스트레이터.
//!
//! 캡처 → 전처리 + 텍스트 감지 → 인코딩 → 장면 해석 순서로 한 사이클을 실행한다.
//! 캡처 실패만 사이클을 중단시키고, OCR/모델 실패는 하위 컴포넌트가 흡수한다.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use glance_core::config::VisionConfig;
use glance_core::error::CoreError;
use glance_core::models::analysis::{AnalysisResult, AnalysisStats, Explanation};
use glance_core::models::frame::{EncodedImage, Frame};
use glance_core::models::scene::SceneInterpretation;
use glance_core::models::text::TextFragment;
use glance_core::ports::frame_source::FrameSource;
use glance_core::ports::ocr_engine::OcrEngine;
use glance_core::ports::scene_model::SceneModel;
use glance_vision::text_detector::TextDetector;
use glance_vision::{encoder, preprocess};

use crate::interpreter::SceneInterpreter;
use crate::stats::UsageStats;

/// 스크린 분석기
///
/// 포트는 `Arc`로 공유되며 분석 호출 간 가변 상태는 마지막 해석과 집계뿐이다.
/// 여러 호출(HTTP 핸들러, 모니터 루프)이 동시에 `analyze_once`를 실행해도 안전하다.
pub struct ScreenAnalyzer {
    source: Arc<dyn FrameSource>,
    detector: TextDetector,
    interpreter: SceneInterpreter,
    vision: VisionConfig,
    last_interpretation: RwLock<Option<SceneInterpretation>>,
    stats: Mutex<UsageStats>,
}

impl ScreenAnalyzer {
    pub fn new(
        source: Arc<dyn FrameSource>,
        ocr: Arc<dyn OcrEngine>,
        model: Arc<dyn SceneModel>,
        vision: VisionConfig,
    ) -> Self {
        let detector = TextDetector::new(ocr, vision.min_ocr_confidence);
        info!(
            ocr = %detector.engine_name(),
            model = %model.provider_name(),
            "스크린 분석기 생성"
        );

        Self {
            source,
            detector,
            interpreter: SceneInterpreter::new(model),
            vision,
            last_interpretation: RwLock::new(None),
            stats: Mutex::new(UsageStats::new()),
        }
    }

    /// 분석 한 사이클 실행
    ///
    /// 결과 시각은 프레임 캡처 시각이다.
    pub async fn analyze_once(&self, hint: Option<&str>) -> Result<AnalysisResult, CoreError> {
        let frame = match self.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.lock().record_failure();
                return Err(e);
            }
        };
        let captured_at = frame.captured_at();

        let (fragments, encoded) = match self.detect_and_encode(frame).await {
            Ok(out) => out,
            Err(e) => {
                self.stats.lock().record_failure();
                return Err(e);
            }
        };

        let mut description = self.interpreter.describe(&encoded, hint, &fragments).await;

        // 폴백 좌표는 고정값이므로 모델 응답일 때만 화면 좌표로 환산
        if !description.degraded {
            for command in &mut description.commands {
                command.coordinates = command.coordinates.map(|c| encoded.to_screen(c));
            }
        }

        *self.last_interpretation.write() = Some(description.interpretation.clone());
        self.stats
            .lock()
            .record_success(Utc::now(), description.commands.len());

        info!(
            elements = fragments.len(),
            commands = description.commands.len(),
            degraded = description.degraded,
            "화면 분석 완료"
        );

        Ok(AnalysisResult::new(
            captured_at,
            fragments,
            description.commands,
            description.interpretation,
            encoded.data_b64,
        ))
    }

    /// 사용자 의도 중심 화면 설명 (OCR 생략)
    pub async fn explain(&self, user_intent: &str) -> Result<Explanation, CoreError> {
        let frame = self.capture().await?;
        let captured_at = frame.captured_at();
        let vision = self.vision.clone();
        let encoded = run_blocking(move || encoder::encode_frame(&frame, &vision)).await?;

        let hint = Some(user_intent).filter(|h| !h.trim().is_empty());
        let description = self.interpreter.describe(&encoded, hint, &[]).await;
        *self.last_interpretation.write() = Some(description.interpretation.clone());

        debug!(degraded = description.degraded, "화면 설명 생성");

        Ok(Explanation {
            timestamp: captured_at,
            explanation: description.interpretation,
            screenshot_b64: encoded.data_b64,
        })
    }

    /// 가장 최근 해석
    pub fn last_interpretation(&self) -> Option<SceneInterpretation> {
        self.last_interpretation.read().clone()
    }

    /// 사용량 집계 스냅샷
    pub fn stats(&self) -> AnalysisStats {
        self.stats.lock().snapshot(Utc::now())
    }

    async fn capture(&self) -> Result<Frame, CoreError> {
        let source = Arc::clone(&self.source);
        let frame = run_blocking(move || source.capture()).await.map_err(|e| {
            warn!("화면 캡처 실패: {e}");
            e
        })?;
        debug!("프레임 캡처: {}x{}", frame.width(), frame.height());
        Ok(frame)
    }

    async fn detect_and_encode(
        &self,
        frame: Frame,
    ) -> Result<(Vec<TextFragment>, EncodedImage), CoreError> {
        let detector = self.detector.clone();
        let vision = self.vision.clone();

        run_blocking(move || {
            let fragments = if vision.ocr_enabled {
                detector.detect(&preprocess::prepare(&frame))
            } else {
                Vec::new()
            };
            let encoded = encoder::encode_frame(&frame, &vision)?;
            Ok((fragments, encoded))
        })
        .await
    }
}

/// 블로킹 작업을 블로킹 풀에서 실행
async fn run_blocking<T, F>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Internal(format!("블로킹 작업 조인 실패: {e}")))?
}

// ============================================================
// 테스트
// ============================================================
