//! 전송 이미지 인코더.
//!
//! 프레임을 (필요 시 축소 후) JPEG 또는 WebP로 인코딩하고 Base64로 감싼다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use glance_core::config::{ImageFormat, VisionConfig};
use glance_core::error::CoreError;
use glance_core::models::frame::{EncodedImage, Frame};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::debug;

use crate::resize;

/// 프레임 인코딩: `scale`은 원본 너비 / 인코딩 너비
pub fn encode_frame(frame: &Frame, config: &VisionConfig) -> Result<EncodedImage, CoreError> {
    if frame.is_empty() {
        return Err(CoreError::Internal("빈 프레임은 인코딩할 수 없음".to_string()));
    }

    let fitted = resize::fit_width(frame.image(), config.max_upload_width)?;
    let (w, h) = fitted.dimensions();
    let quality = config.image_quality.clamp(1, 100);

    let bytes = match config.image_format {
        ImageFormat::Jpeg => encode_jpeg(&fitted, quality)?,
        ImageFormat::Webp => encode_webp(&fitted, quality),
    };

    debug!(
        "프레임 인코딩: {}x{} → {}x{} {:?} {} bytes (품질 {})",
        frame.width(),
        frame.height(),
        w,
        h,
        config.image_format,
        bytes.len(),
        quality
    );

    Ok(EncodedImage {
        data_b64: B64.encode(&bytes),
        format: config.image_format,
        width: w,
        height: h,
        scale: f64::from(frame.width()) / f64::from(w),
    })
}

/// JPEG 인코딩
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| CoreError::Internal(format!("JPEG 인코딩 실패: {e}")))?;
    Ok(buf)
}

/// WebP 인코딩 (손실)
pub fn encode_webp(image: &RgbImage, quality: u8) -> Vec<u8> {
    let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
    encoder.encode(f32::from(quality)).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(RgbImage::from_pixel(w, h, image::Rgb([30, 120, 200])))
    }

    #[test]
    fn jpeg_round_trips_through_base64() {
        let encoded = encode_frame(&frame(64, 32), &VisionConfig::default()).unwrap();
        assert_eq!(encoded.mime_type(), "image/jpeg");
        assert_eq!((encoded.width, encoded.height), (64, 32));
        assert!((encoded.scale - 1.0).abs() < f64::EPSILON);

        let bytes = B64.decode(&encoded.data_b64).unwrap();
        // JPEG SOI 마커
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn webp_has_riff_header() {
        let config = VisionConfig {
            image_format: ImageFormat::Webp,
            ..VisionConfig::default()
        };
        let encoded = encode_frame(&frame(32, 32), &config).unwrap();
        let bytes = B64.decode(&encoded.data_b64).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(encoded.mime_type(), "image/webp");
    }

    #[test]
    fn wide_frame_is_downscaled_with_scale() {
        let config = VisionConfig {
            max_upload_width: 100,
            ..VisionConfig::default()
        };
        let encoded = encode_frame(&frame(400, 200), &config).unwrap();
        assert_eq!((encoded.width, encoded.height), (100, 50));
        assert!((encoded.scale - 4.0).abs() < 1e-9);
        assert_eq!(encoded.to_screen((25, 10)), (100, 40));
    }

    #[test]
    fn empty_frame_is_error() {
        let result = encode_frame(&frame(0, 0), &VisionConfig::default());
        assert!(result.is_err());
    }
}
