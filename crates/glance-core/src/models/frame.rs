//! 프레임(스크린샷) 모델.
//!
//! 캡처 원본 `Frame`, OCR용 `PreprocessedFrame`, 모델 전송용 `EncodedImage`.

use chrono::{DateTime, Utc};
use image::{GrayImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ImageFormat;

/// 캡처된 화면 한 장 (3채널 RGB, 불변)
///
/// 픽셀 버퍼는 `Arc`로 공유되므로 복제 비용이 낮다.
#[derive(Debug, Clone)]
pub struct Frame {
    image: Arc<RgbImage>,
    captured_at: DateTime<Utc>,
}

impl Frame {
    /// RGB 버퍼로 프레임 생성 (캡처 시각 = 현재)
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
            captured_at: Utc::now(),
        }
    }

    /// 캡처 백엔드의 RGBA 버퍼를 알파 채널을 버리고 변환
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self::new(image::DynamicImage::ImageRgba8(rgba).to_rgb8())
    }

    /// 픽셀 버퍼
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 너비 또는 높이가 0인지
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// 캡처 시각
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// OCR 입력용 단일 채널 이진화 프레임
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedFrame {
    image: GrayImage,
}

impl PreprocessedFrame {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// 픽셀 버퍼
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// 모델 전송용으로 인코딩된 프레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Base64 인코딩된 이미지 바이트
    pub data_b64: String,
    /// 이미지 포맷
    pub format: ImageFormat,
    /// 인코딩된 이미지 너비
    pub width: u32,
    /// 인코딩된 이미지 높이
    pub height: u32,
    /// 원본 너비 / 인코딩 너비 (모델 좌표 → 화면 좌표 변환 배율)
    pub scale: f64,
}

impl EncodedImage {
    /// MIME 타입
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// 인코딩 이미지 좌표를 원본 화면 좌표로 변환
    pub fn to_screen(&self, (x, y): (i32, i32)) -> (i32, i32) {
        if (self.scale - 1.0).abs() < f64::EPSILON {
            return (x, y);
        }
        (
            (x as f64 * self.scale).round() as i32,
            (y as f64 * self.scale).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_from_rgba_drops_alpha() {
        let rgba = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]));
        let frame = Frame::from_rgba(rgba);
        assert_eq!((frame.width(), frame.height()), (4, 3));
        assert_eq!(frame.image().get_pixel(0, 0).0, [10, 20, 30]);
        assert!(!frame.is_empty());
    }

    #[test]
    fn frame_clone_shares_buffer() {
        let frame = Frame::new(RgbImage::new(8, 8));
        let copy = frame.clone();
        assert!(std::ptr::eq(frame.image(), copy.image()));
    }

    #[test]
    fn encoded_image_scales_coordinates() {
        let encoded = EncodedImage {
            data_b64: String::new(),
            format: ImageFormat::Jpeg,
            width: 1280,
            height: 720,
            scale: 2.0,
        };
        assert_eq!(encoded.to_screen((100, 51)), (200, 102));

        let unscaled = EncodedImage {
            scale: 1.0,
            ..encoded
        };
        assert_eq!(unscaled.to_screen((100, 51)), (100, 51));
    }
}
