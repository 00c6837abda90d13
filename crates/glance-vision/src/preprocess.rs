//! OCR 전처리.
//!
//! 그레이스케일 → 가우시안 블러 → 적응형 가우시안 이진화 → 2x2 모폴로지 닫기.
//! 순수 함수이며 같은 입력에 대해 비트 단위로 같은 결과를 낸다.

use glance_core::models::frame::{Frame, PreprocessedFrame};
use image::{GrayImage, Luma};

/// 노이즈 제거 블러 σ (5x5 가우시안 커널 상당)
pub const NOISE_BLUR_SIGMA: f32 = 1.1;

/// 적응형 이진화 지역 평균 σ (11x11 블록 상당)
pub const THRESHOLD_BLOCK_SIGMA: f32 = 2.0;

/// 적응형 이진화 오프셋: 지역 평균보다 이만큼 어두워야 검정
pub const THRESHOLD_OFFSET: i16 = 2;

/// 전처리 파이프라인
pub fn prepare(frame: &Frame) -> PreprocessedFrame {
    if frame.is_empty() {
        return PreprocessedFrame::new(GrayImage::new(frame.width(), frame.height()));
    }

    let gray = image::imageops::grayscale(frame.image());
    let blurred = image::imageops::blur(&gray, NOISE_BLUR_SIGMA);
    let binary = adaptive_threshold(&blurred);
    PreprocessedFrame::new(close_2x2(&binary))
}

/// 적응형 가우시안 이진화: `src > local_mean - THRESHOLD_OFFSET`이면 흰색
fn adaptive_threshold(image: &GrayImage) -> GrayImage {
    let local_mean = image::imageops::blur(image, THRESHOLD_BLOCK_SIGMA);
    let mut out = GrayImage::new(image.width(), image.height());

    for ((dst, src), mean) in out
        .pixels_mut()
        .zip(image.pixels())
        .zip(local_mean.pixels())
    {
        let white = i16::from(src.0[0]) > i16::from(mean.0[0]) - THRESHOLD_OFFSET;
        *dst = Luma([if white { 255 } else { 0 }]);
    }

    out
}

/// 2x2 사각 커널 모폴로지 닫기 (팽창 후 반사 커널로 침식)
///
/// 1픽셀 폭의 검정 틈은 메우고, 2픽셀 이상 획은 원래 위치에 유지된다.
fn close_2x2(image: &GrayImage) -> GrayImage {
    let dilated = window_2x2(image, 1, u8::max);
    window_2x2(&dilated, -1, u8::min)
}

/// 각 픽셀을 자신과 `dir` 방향 이웃 3개(2x2 창)에 `op`를 적용한 값으로 바꾼다.
/// 경계 밖 좌표는 가장자리 픽셀로 클램프한다.
fn window_2x2(image: &GrayImage, dir: i64, op: fn(u8, u8) -> u8) -> GrayImage {
    let (w, h) = image.dimensions();
    let clamp = |v: i64, max: u32| v.clamp(0, i64::from(max) - 1) as u32;

    GrayImage::from_fn(w, h, |x, y| {
        let nx = clamp(i64::from(x) + dir, w);
        let ny = clamp(i64::from(y) + dir, h);
        let value = [(x, y), (nx, y), (x, ny), (nx, ny)]
            .iter()
            .map(|&(px, py)| image.get_pixel(px, py).0[0])
            .fold(image.get_pixel(x, y).0[0], op);
        Luma([value])
    })
}
