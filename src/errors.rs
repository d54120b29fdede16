use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitelyticsError {
    StorageUnavailable(String),
    StorageOperation(String),
    QuotaExceeded(String),
    FileOperation(String),
    Serialization(String),
    Validation(String),
    Configuration(String),
    Relay(String),
    Unauthorized(String),
}

impl InvitelyticsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            InvitelyticsError::StorageUnavailable(_) => "E001",
            InvitelyticsError::StorageOperation(_) => "E002",
            InvitelyticsError::QuotaExceeded(_) => "E003",
            InvitelyticsError::FileOperation(_) => "E004",
            InvitelyticsError::Serialization(_) => "E005",
            InvitelyticsError::Validation(_) => "E006",
            InvitelyticsError::Configuration(_) => "E007",
            InvitelyticsError::Relay(_) => "E008",
            InvitelyticsError::Unauthorized(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            InvitelyticsError::StorageUnavailable(_) => "Storage Unavailable",
            InvitelyticsError::StorageOperation(_) => "Storage Operation Error",
            InvitelyticsError::QuotaExceeded(_) => "Storage Quota Exceeded",
            InvitelyticsError::FileOperation(_) => "File Operation Error",
            InvitelyticsError::Serialization(_) => "Serialization Error",
            InvitelyticsError::Validation(_) => "Validation Error",
            InvitelyticsError::Configuration(_) => "Configuration Error",
            InvitelyticsError::Relay(_) => "Relay Error",
            InvitelyticsError::Unauthorized(_) => "Unauthorized",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            InvitelyticsError::StorageUnavailable(msg)
            | InvitelyticsError::StorageOperation(msg)
            | InvitelyticsError::QuotaExceeded(msg)
            | InvitelyticsError::FileOperation(msg)
            | InvitelyticsError::Serialization(msg)
            | InvitelyticsError::Validation(msg)
            | InvitelyticsError::Configuration(msg)
            | InvitelyticsError::Relay(msg)
            | InvitelyticsError::Unauthorized(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for InvitelyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for InvitelyticsError {}

// 便捷的构造函数
impl InvitelyticsError {
    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::StorageUnavailable(msg.into())
    }

    pub fn storage_operation<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::StorageOperation(msg.into())
    }

    pub fn quota_exceeded<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::QuotaExceeded(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::Validation(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::Configuration(msg.into())
    }

    pub fn relay<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::Relay(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        InvitelyticsError::Unauthorized(msg.into())
    }
}

impl From<std::io::Error> for InvitelyticsError {
    fn from(err: std::io::Error) -> Self {
        InvitelyticsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for InvitelyticsError {
    fn from(err: serde_json::Error) -> Self {
        InvitelyticsError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for InvitelyticsError {
    fn from(err: config::ConfigError) -> Self {
        InvitelyticsError::Configuration(err.to_string())
    }
}

impl From<ureq::Error> for InvitelyticsError {
    fn from(err: ureq::Error) -> Self {
        InvitelyticsError::Relay(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InvitelyticsError>;
