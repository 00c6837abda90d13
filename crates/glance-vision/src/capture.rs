//! 스크린 캡처.
//!
//! xcap 기반. 주 모니터 전체, 제목으로 찾은 창, 고정 사각형 영역을 지원한다.

use glance_core::config::CaptureRegion;
use glance_core::error::CoreError;
use glance_core::models::frame::Frame;
use glance_core::ports::frame_source::FrameSource;
use image::RgbaImage;
use tracing::{debug, warn};
use xcap::{Monitor, Window};

/// 스크린 캡처: `FrameSource` 포트 구현
pub struct ScreenCapture {
    region: CaptureRegion,
}

impl ScreenCapture {
    /// 새 캡처 인스턴스 생성
    pub fn new(region: CaptureRegion) -> Self {
        Self { region }
    }

    /// 설정된 캡처 영역
    pub fn region(&self) -> &CaptureRegion {
        &self.region
    }

    /// 주 모니터 스크린 캡처 (주 모니터가 없으면 첫 모니터)
    fn capture_primary(&self) -> Result<RgbaImage, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::CaptureUnavailable(format!("모니터 목록 조회 실패: {e}")))?;

        let index = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        let monitor = monitors
            .get(index)
            .ok_or_else(|| CoreError::CaptureUnavailable("모니터를 찾을 수 없음".to_string()))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::CaptureUnavailable(format!("스크린 캡처 실패: {e}")))?;

        debug!("스크린 캡처 완료: {}x{}", image.width(), image.height());
        Ok(image)
    }

    /// 제목이 일치하는 첫 번째 (최소화되지 않은) 창 캡처
    fn capture_window(&self, title: &str) -> Option<RgbaImage> {
        let windows = match Window::all() {
            Ok(windows) => windows,
            Err(e) => {
                warn!("창 목록 조회 실패: {e}");
                return None;
            }
        };

        let window = windows.into_iter().find(|w| {
            !w.is_minimized().unwrap_or(false)
                && title_matches(&w.title().unwrap_or_default(), title)
        })?;

        match window.capture_image() {
            Ok(image) => {
                debug!(
                    "창 캡처 완료: '{}' {}x{}",
                    title,
                    image.width(),
                    image.height()
                );
                Some(image)
            }
            Err(e) => {
                warn!("창 캡처 실패 '{title}': {e}");
                None
            }
        }
    }
}

impl FrameSource for ScreenCapture {
    fn capture(&self) -> Result<Frame, CoreError> {
        let image = match &self.region {
            CaptureRegion::FullDisplay => self.capture_primary()?,
            CaptureRegion::Window { title } => match self.capture_window(title) {
                Some(image) => image,
                None => {
                    warn!("창 '{title}'을(를) 캡처할 수 없어 전체 화면으로 대체");
                    self.capture_primary()?
                }
            },
            CaptureRegion::Rect {
                x,
                y,
                width,
                height,
            } => {
                let full = self.capture_primary()?;
                crop_region(&full, *x, *y, *width, *height)?
            }
        };

        Ok(Frame::from_rgba(image))
    }
}

/// 창 제목 부분 일치 (대소문자 무시, 빈 검색어는 불일치)
pub fn title_matches(window_title: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty()
        && window_title
            .to_lowercase()
            .contains(&needle.to_lowercase())
}

/// 사각형 영역 잘라내기: 이미지 경계로 클램프, 교집합이 없으면 캡처 실패
pub fn crop_region(
    image: &RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<RgbaImage, CoreError> {
    let (img_w, img_h) = image.dimensions();
    if x >= img_w || y >= img_h || width == 0 || height == 0 {
        return Err(CoreError::CaptureUnavailable(format!(
            "캡처 영역 ({x}, {y}, {width}x{height})이 화면 {img_w}x{img_h} 밖에 있음"
        )));
    }

    let w = width.min(img_w - x);
    let h = height.min(img_h - y);
    if w != width || h != height {
        debug!("캡처 영역 클램프: {width}x{height} → {w}x{h}");
    }

    Ok(image::imageops::crop_imm(image, x, y, w, h).to_image())
}
