//! 전송용 축소.
//!
//! fast_image_resize 기반 고속 리사이즈. 가로 폭 상한을 넘는 프레임만 비율 유지 축소한다.

use std::borrow::Cow;

use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use glance_core::error::CoreError;
use image::RgbImage;
use tracing::debug;

/// 가로 폭이 `max_width`를 넘으면 비율을 유지해 축소 (`max_width == 0`이면 원본)
pub fn fit_width(image: &RgbImage, max_width: u32) -> Result<Cow<'_, RgbImage>, CoreError> {
    let (src_w, src_h) = image.dimensions();
    if max_width == 0 || src_w <= max_width {
        return Ok(Cow::Borrowed(image));
    }

    let (dst_w, dst_h) = scaled_dimensions(src_w, src_h, max_width);
    resize_rgb(image, dst_w, dst_h).map(Cow::Owned)
}

/// 목표 너비에 맞춘 (너비, 높이): 높이는 반올림, 최소 1
pub fn scaled_dimensions(src_w: u32, src_h: u32, max_width: u32) -> (u32, u32) {
    let ratio = f64::from(max_width) / f64::from(src_w);
    let height = (f64::from(src_h) * ratio).round().max(1.0) as u32;
    (max_width, height)
}

/// RGB 이미지 리사이즈
pub fn resize_rgb(image: &RgbImage, width: u32, height: u32) -> Result<RgbImage, CoreError> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Internal("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Internal("목표 이미지 크기 0".to_string()));
    }

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;
    let mut dst_image = FirImage::new(width, height, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    debug!("전송용 축소: {src_w}x{src_h} → {width}x{height}");

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Internal("결과 이미지 생성 실패".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_image_is_borrowed() {
        let img = RgbImage::new(800, 600);
        assert!(matches!(fit_width(&img, 1920).unwrap(), Cow::Borrowed(_)));
        assert!(matches!(fit_width(&img, 0).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn wide_image_keeps_aspect_ratio() {
        let img = RgbImage::from_pixel(3840, 2160, image::Rgb([200, 100, 50]));
        let out = fit_width(&img, 1920).unwrap();
        assert_eq!(out.dimensions(), (1920, 1080));
        // 단색 이미지는 축소 후에도 (반올림 오차 내에서) 같은 색
        let px = out.get_pixel(960, 540).0;
        for (got, want) in px.iter().zip([200u8, 100, 50]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }

    #[test]
    fn scaled_height_never_zero() {
        assert_eq!(scaled_dimensions(5000, 1, 100), (100, 1));
        assert_eq!(scaled_dimensions(1000, 333, 500), (500, 167));
    }

    #[test]
    fn zero_target_is_error() {
        let img = RgbImage::new(10, 10);
        assert!(resize_rgb(&img, 0, 5).is_err());
    }
}
