//! API 키 조회.
//!
//! 우선순위: 명시적 값 → 환경 변수 → 작업 디렉토리의 `.env` 파일.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// API 키로 인정하는 변수 이름 (앞쪽이 우선)
pub const API_KEY_VARS: [&str; 2] = ["GLANCE_API_KEY", "GOOGLE_API_KEY"];

/// `.env` 형식 본문에서 `key` 값을 찾는다.
///
/// `KEY=value` 형식만 인식한다. `#` 주석, 빈 줄, `export ` 접두어를 허용하고
/// 값을 감싼 작은/큰따옴표는 제거한다. 빈 값은 없는 것으로 취급한다.
pub fn parse_env_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (name, value) = line.split_once('=')?;
        if name.trim() != key {
            return None;
        }
        let value = value
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// `.env` 파일에서 API 키 로드
pub fn load_from_env_file(path: &Path) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if path.exists() {
                warn!("{} 읽기 실패: {e}", path.display());
            }
            return None;
        }
    };

    let key = API_KEY_VARS
        .iter()
        .find_map(|name| parse_env_value(&content, name));
    if key.is_some() {
        debug!("{}에서 API 키 로드", path.display());
    }
    key
}

/// API 키 해석: 명시적 값, 환경 변수, `.env` 순서
pub fn resolve_api_key(explicit: Option<&str>, env_file: &Path) -> Option<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let from_env = API_KEY_VARS.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    });
    if from_env.is_some() {
        debug!("환경 변수에서 API 키 로드");
        return from_env;
    }

    load_from_env_file(env_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_quoted_and_commented_values() {
        let content = r#"
# Gemini 설정
OTHER=1
export GOOGLE_API_KEY="abc-123"
"#;
        assert_eq!(
            parse_env_value(content, "GOOGLE_API_KEY").as_deref(),
            Some("abc-123")
        );
        assert_eq!(parse_env_value(content, "OTHER").as_deref(), Some("1"));
    }

    #[test]
    fn missing_or_empty_key_is_none() {
        assert!(parse_env_value("GOOGLE_API_KEY=''\n", "GOOGLE_API_KEY").is_none());
        assert!(parse_env_value("#GOOGLE_API_KEY=x\n", "GOOGLE_API_KEY").is_none());
        assert!(parse_env_value("", "GOOGLE_API_KEY").is_none());
    }

    #[test]
    fn value_may_contain_equals_sign() {
        assert_eq!(
            parse_env_value("GLANCE_API_KEY=a=b", "GLANCE_API_KEY").as_deref(),
            Some("a=b")
        );
    }

    #[test]
    fn explicit_key_wins() {
        let dir = TempDir::new().unwrap();
        let key = resolve_api_key(Some("  flag-key "), &dir.path().join(".env"));
        assert_eq!(key.as_deref(), Some("flag-key"));
    }

    #[test]
    fn env_file_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GLANCE_API_KEY=from-file\n").unwrap();
        assert_eq!(load_from_env_file(&path).as_deref(), Some("from-file"));
        assert!(load_from_env_file(&dir.path().join("missing.env")).is_none());
    }
}
