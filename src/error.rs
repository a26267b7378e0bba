use std::fmt;

use thiserror::Error;

use crate::models::UploadFormat;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 批量导入错误
    Ingest(IngestError),
    /// 存储层错误
    Store(StoreError),
    /// 账号相关错误
    Account(AccountError),
    /// 请求参数错误
    Request(RequestError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Ingest(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Account(e) => write!(f, "{}", e),
            AppError::Request(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Ingest(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::Account(e) => Some(e),
            AppError::Request(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

impl AppError {
    /// 对应的 HTTP 状态码
    ///
    /// 解析失败沿用 500，见 DESIGN.md 中的说明。
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Ingest(e) => e.status_code(),
            AppError::Store(StoreError::NotFound { .. }) => 404,
            AppError::Store(_) => 500,
            AppError::Account(AccountError::UsernameTaken { .. }) => 400,
            AppError::Account(AccountError::InvalidCredentials) => 401,
            AppError::Account(AccountError::BlankField { .. }) => 400,
            AppError::Request(RequestError::NotFound { .. }) => 404,
            AppError::Request(RequestError::PayloadTooLarge(_)) => 413,
            AppError::Request(_) => 400,
            AppError::Config(_) | AppError::Other(_) => 500,
        }
    }
}

/// 批量导入错误
#[derive(Debug, Error)]
pub enum IngestError {
    /// 声明的格式不受支持（在任何 I/O 之前拒绝）
    #[error("Unsupported format '{token}': only CSV or PDF allowed")]
    UnsupportedFormat { token: String },

    /// 请求中没有附带文件
    #[error("No file uploaded")]
    MissingFile,

    /// 文件内容无法按声明的格式解析
    #[error("Failed to parse {format} upload: {message}")]
    Parse {
        format: UploadFormat,
        message: String,
    },

    /// 持久化失败，整批未提交
    #[error("Failed to store questions: {0}")]
    Persistence(#[source] StoreError),
}

impl IngestError {
    pub fn parse(format: UploadFormat, message: impl Into<String>) -> Self {
        IngestError::Parse {
            format,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::UnsupportedFormat { .. } | IngestError::MissingFile => 400,
            IngestError::Parse { .. } | IngestError::Persistence(_) => 500,
        }
    }
}

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite 执行失败
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// 连接锁被毒化（持锁线程 panic）
    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// 唯一约束冲突
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    /// 记录不存在
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

/// 账号相关错误
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username already exists")]
    UsernameTaken { username: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{field} must not be empty")]
    BlankField { field: &'static str },
}

/// 请求参数错误
#[derive(Debug, Error)]
pub enum RequestError {
    /// 请求体或字段不合法
    #[error("{0}")]
    Invalid(String),

    /// 引用的资源不存在
    #[error("{what}")]
    NotFound { what: String },

    /// 请求体超过上传大小上限
    #[error("{0}")]
    PayloadTooLarge(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        AppError::Account(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Store(StoreError::Database(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求参数错误
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::Request(RequestError::Invalid(message.into()))
    }

    /// 创建资源不存在错误
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::Request(RequestError::NotFound { what: what.into() })
    }

    /// 创建请求体过大错误
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        AppError::Request(RequestError::PayloadTooLarge(message.into()))
    }

    /// 包装后台任务 join 失败等杂项错误
    pub fn other(message: impl Into<String>) -> Self {
        AppError::Other(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
