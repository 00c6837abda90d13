//! 프레임 소스 포트.
//!
//! 구현: `glance-vision::capture::ScreenCapture` (xcap)

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 현재 화면을 한 장 캡처한다.
///
/// 실패 시 `CoreError::CaptureUnavailable`을 반환해야 하며, 내부 재시도는 하지 않는다.
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> Result<Frame, CoreError>;
}
