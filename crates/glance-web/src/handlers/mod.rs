//! API 핸들러 모음.

pub mod analysis;
pub mod health;
pub mod monitor;
pub mod session;
pub mod stats;

use axum::body::Bytes;
use axum::extract::OriginalUri;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// 선택적 JSON 본문 파싱: 빈 본문은 기본값
pub(crate) fn optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("요청 본문 JSON 파싱 실패: {e}")))
}

/// 등록되지 않은 경로: JSON 404
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Body {
        interval: Option<f64>,
    }

    #[test]
    fn empty_body_is_default() {
        let body: Body = optional_json(&Bytes::new()).unwrap();
        assert!(body.interval.is_none());
        let body: Body = optional_json(&Bytes::from_static(b"  \n")).unwrap();
        assert!(body.interval.is_none());
    }

    #[test]
    fn invalid_body_is_bad_request() {
        let result: Result<Body, _> = optional_json(&Bytes::from_static(b"{nope"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn body_fields_are_read() {
        let body: Body = optional_json(&Bytes::from_static(br#"{"interval": 0.5}"#)).unwrap();
        assert_eq!(body.interval, Some(0.5));
    }
}
