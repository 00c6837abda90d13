//! 설정 파일 관리.
//!
//! 설정은 JSON 한 파일이다. 기본 위치는 `directories`가 알려주는 플랫폼 설정 디렉토리이고
//! CLI `--config`로 바꿀 수 있다. 파일이 없으면 기본값으로 만들어 두고,
//! 읽은 값은 사용 전에 범위를 검증한다.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 파일 + 로드된 값
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: AppConfig,
    path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로의 설정 열기
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(default_config_path()?)
    }

    /// 지정 경로의 설정 열기 (없으면 기본값으로 생성)
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        let config = if path.is_file() {
            let config = read_config(&path)?;
            validate(&config)?;
            debug!(path = %path.display(), "설정 로드");
            config
        } else {
            let config = AppConfig::default_config();
            write_config(&path, &config)?;
            info!(path = %path.display(), "기본 설정 파일 생성");
            config
        };

        Ok(Self {
            current: config,
            path,
        })
    }

    /// 현재 설정 (복제본)
    pub fn get(&self) -> AppConfig {
        self.current.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }
}

/// 플랫폼별 기본 설정 파일 경로
///
/// - Linux: `~/.config/glance/config.json`
/// - macOS: `~/Library/Application Support/dev.glance.glance/config.json`
/// - Windows: `%APPDATA%\glance\glance\config\config.json`
pub fn default_config_path() -> Result<PathBuf, CoreError> {
    ProjectDirs::from("dev", "glance", "glance")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

/// 값 범위 검증
pub fn validate(config: &AppConfig) -> Result<(), CoreError> {
    let invalid = |field: &str, message: &str| {
        Err(CoreError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        })
    };

    if !(1..=100).contains(&config.vision.image_quality) {
        return invalid("vision.image_quality", "1~100 범위여야 함");
    }
    if config.vision.min_ocr_confidence > 100 {
        return invalid("vision.min_ocr_confidence", "0~100 범위여야 함");
    }
    let interval = config.monitor.default_interval_secs;
    if !interval.is_finite() || interval <= 0.0 {
        return invalid("monitor.default_interval_secs", "0보다 큰 값이어야 함");
    }
    if config.llm.timeout_secs == 0 {
        return invalid("llm.timeout_secs", "0보다 커야 함");
    }
    if config.web.port == 0 {
        return invalid("web.port", "0은 사용할 수 없음");
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })
}

/// 임시 파일에 쓴 뒤 이름을 바꿔 부분 기록을 남기지 않는다
fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", dir.display()))
        })?;
    }

    let json = serde_json::to_string_pretty(config)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiProviderType;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let manager = ConfigManager::with_path(path.clone()).unwrap();
        assert!(path.is_file());
        assert!(!dir.path().join("nested").join("config.json.tmp").exists());
        assert_eq!(manager.get().web.port, 5000);
        assert_eq!(manager.config_path(), path.as_path());
    }

    #[test]
    fn edited_file_is_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        ConfigManager::with_path(path.clone()).unwrap();

        let mut edited = AppConfig::default_config();
        edited.web.port = 8080;
        edited.llm.provider = AiProviderType::Anthropic;
        fs::write(&path, serde_json::to_string(&edited).unwrap()).unwrap();

        let reloaded = ConfigManager::with_path(path).unwrap().get();
        assert_eq!(reloaded.web.port, 8080);
        assert_eq!(reloaded.llm.provider, AiProviderType::Anthropic);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"web": {"port": 7000}}"#).unwrap();

        let config = ConfigManager::with_path(path.clone()).unwrap().get();
        assert_eq!(config.web.port, 7000);
        assert_eq!(config.vision.image_quality, 85);
        // 기존 파일은 덮어쓰지 않는다
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"web": {"port": 7000}}"#
        );
    }

    #[test]
    fn unparsable_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ConfigManager::with_path(path),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"monitor": {"default_interval_secs": 0}}"#).unwrap();

        match ConfigManager::with_path(path) {
            Err(CoreError::Validation { field, .. }) => {
                assert_eq!(field, "monitor.default_interval_secs")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
