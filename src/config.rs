use crate::error::{InspectionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FEED_URL_ENV: &str = "INSPECTION_FEED_URL";
const FEED_AUTH_ENV: &str = "INSPECTION_FEED_AUTH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// InspectionSchedule のベースURL（未設定ならオフライン）
    pub schedule_url: Option<String>,
    /// Authorization ヘッダの値
    pub auth_header: Option<String>,
    /// 画像とレコードの保存先
    pub data_dir: Option<PathBuf>,
    pub success_notice_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule_url: None,
            auth_header: None,
            data_dir: None,
            success_notice_ms: 5000,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InspectionError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("inspection-form").join("config.json"))
    }

    /// フィードURL（環境変数を優先）
    pub fn feed_url(&self) -> Option<String> {
        std::env::var(FEED_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.schedule_url.clone())
    }

    pub fn feed_auth(&self) -> Option<String> {
        std::env::var(FEED_AUTH_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.auth_header.clone())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_local_dir()
            .ok_or_else(|| InspectionError::Config("data directory not found".into()))?;
        Ok(base.join("inspection-form"))
    }

    pub fn success_notice_delay(&self) -> Duration {
        Duration::from_millis(self.success_notice_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.success_notice_delay(), Duration::from_millis(5000));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.schedule_url.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            schedule_url: Some("https://example.com/data".into()),
            data_dir: Some(dir.path().join("data")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir().unwrap(), dir.path().join("data"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "timeout_seconds": 5 }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout_seconds, 5);
        assert_eq!(loaded.success_notice_ms, 5000);
    }
}
