use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：INVITE__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "INVITE";

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackendKind {
    /// 进程内存（测试与一次性会话）
    Memory,
    /// 单个 JSON 文件，多个进程共享同一份数据
    #[default]
    File,
}

impl std::fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for StorageBackendKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|kind| kind.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid storage backend: '{}'. Valid: memory, file", s))
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 接收端点地址、端口、worker 数量、CORS
/// - storage: 访客数据存储后端
/// - analytics: 可选的数据转发（relay）
/// - admin: 管理面板登录凭据
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：INVITE，分隔符：__
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// 加载配置，出错时返回错误而不是回退到默认值
    pub fn try_load(path: &str) -> crate::errors::Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<StaticConfig>()?)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 接收端点（relay endpoint）服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 允许跨域提交数据的站点，空列表表示仅同源，`["*"]` 表示任意来源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// 存储后端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// 存储容量上限（字节），0 表示不限制；模拟浏览器的 quota
    #[serde(default)]
    pub quota_bytes: usize,
}

/// 数据转发配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// 是否在页面加载时把快照转发到 endpoint
    #[serde(default)]
    pub relay_enabled: bool,
    #[serde(default = "default_relay_endpoint")]
    pub relay_endpoint: String,
    /// 请求超时（秒），未设置时使用 HTTP 客户端默认值
    #[serde(default)]
    pub relay_timeout_secs: Option<u64>,
}

/// 管理面板登录配置
///
/// 注意：这只是界面层面的访问门槛，不是安全边界
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,
    /// 明文或 Argon2 哈希（以 `$argon2` 开头），为空时禁止登录
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_storage_path() -> String {
    "analytics_store.json".to_string()
}

fn default_relay_endpoint() -> String {
    "http://127.0.0.1:8080/api/analytics".to_string()
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_session_hours() -> u64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            path: default_storage_path(),
            quota_bytes: 0,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            relay_enabled: false,
            relay_endpoint: default_relay_endpoint(),
            relay_timeout_secs: None,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            password: String::new(),
            session_hours: default_session_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!(
            "FILE".parse::<StorageBackendKind>(),
            Ok(StorageBackendKind::File)
        );
        assert_eq!(
            "memory".parse::<StorageBackendKind>(),
            Ok(StorageBackendKind::Memory)
        );
        assert!("redis".parse::<StorageBackendKind>().is_err());
    }

    #[test]
    fn test_sample_config_roundtrip() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [storage]
            backend = "memory"

            [admin]
            password = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.storage.backend, StorageBackendKind::Memory);
        assert_eq!(parsed.storage.path, "analytics_store.json");
        assert_eq!(parsed.admin.email, "admin@example.com");
        assert_eq!(parsed.admin.session_hours, 24);
        assert!(!parsed.analytics.relay_enabled);
    }
}
