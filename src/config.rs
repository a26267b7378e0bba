use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "INTERVIEW_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// SQLite 数据库文件
    pub database_path: String,
    /// 上传文件归档目录，为空则不归档
    pub upload_archive_dir: Option<String>,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 注册时获得管理员角色的用户名
    pub admin_username: String,
    /// 作答超过这个字符数才算"认真作答"
    pub feedback_min_chars: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            database_path: "interview_ai.db".to_string(),
            upload_archive_dir: None,
            max_upload_bytes: 10 * 1024 * 1024,
            admin_username: "admin".to_string(),
            feedback_min_chars: 5,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：`$INTERVIEW_CONFIG` 指向的 TOML 文件（如有），再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取，缺省字段取默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 只使用默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(self.bind_addr),
            database_path: std::env::var("DATABASE_PATH").unwrap_or(self.database_path),
            upload_archive_dir: std::env::var("UPLOAD_ARCHIVE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .or(self.upload_archive_dir),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.max_upload_bytes),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or(self.admin_username),
            feedback_min_chars: std::env::var("FEEDBACK_MIN_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.feedback_min_chars),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }
}
