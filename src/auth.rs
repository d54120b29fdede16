//! 管理面板访问控制
//!
//! 登录状态保存在与分析数据相同的键值存储中（`admin_token`、
//! `admin_email`、`admin_login_time`）。任何能读写存储的人都能伪造
//! 登录状态，这只是界面层面的门槛，不是安全边界。

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::analytics::clock::{Clock, SystemClock};
use crate::analytics::session::parse_counter;
use crate::config::AdminConfig;
use crate::errors::{InvitelyticsError, Result};
use crate::storage::{KeyValueStore, keys};
use crate::utils::password::verify_password;

/// 登录成功后保存的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub email: String,
    pub token: String,
    pub logged_in_at: DateTime<Utc>,
}

/// 管理面板访问控制特征
pub trait AccessGate: Send + Sync {
    /// 当前是否处于有效登录状态；过期的会话会被清除
    fn is_authorized(&self) -> bool;

    /// 校验凭据并保存登录状态
    fn login(&self, email: &str, password: &str) -> Result<AdminSession>;

    fn logout(&self);

    /// 已保存的登录邮箱（不检查是否过期）
    fn current_user(&self) -> Option<String>;

    /// 会话剩余时间，未登录时为 None
    fn session_time_remaining(&self) -> Option<Duration>;
}

/// 基于本地配置的访问控制
pub struct LocalAdminGate {
    store: Arc<dyn KeyValueStore>,
    config: AdminConfig,
    clock: Arc<dyn Clock>,
}

impl LocalAdminGate {
    pub fn new(store: Arc<dyn KeyValueStore>, config: AdminConfig) -> Self {
        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn session_duration(&self) -> Duration {
        Duration::hours(self.config.session_hours.min(i64::MAX as u64 / 3600) as i64)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                debug!("Admin gate read of '{}' failed: {}", key, e);
                None
            }
        }
    }

    /// 已保存的登录时间（毫秒时间戳）
    fn login_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.read(keys::ADMIN_LOGIN_TIME)?;
        let millis = parse_counter(Some(raw));
        DateTime::from_timestamp_millis(i64::try_from(millis).ok()?)
    }

    fn clear(&self) {
        for key in keys::ADMIN_KEYS {
            if let Err(e) = self.store.remove_item(key) {
                warn!("Failed to clear '{}': {}", key, e);
            }
        }
    }
}

impl AccessGate for LocalAdminGate {
    fn is_authorized(&self) -> bool {
        let (Some(_token), Some(email), Some(login_time)) = (
            self.read(keys::ADMIN_TOKEN),
            self.read(keys::ADMIN_EMAIL),
            self.login_time(),
        ) else {
            return false;
        };

        if self.clock.now() - login_time > self.session_duration() {
            info!("Admin session for {} expired", email);
            self.clear();
            return false;
        }

        email == self.config.email
    }

    fn login(&self, email: &str, password: &str) -> Result<AdminSession> {
        if self.config.password.is_empty() {
            return Err(InvitelyticsError::unauthorized(
                "admin login is disabled (admin.password is not set)",
            ));
        }

        if email != self.config.email || !verify_password(password, &self.config.password)? {
            warn!("Rejected admin login for '{}'", email);
            return Err(InvitelyticsError::unauthorized("Invalid email or password"));
        }

        let now = self.clock.now();
        let millis = now.timestamp_millis();
        let token = STANDARD.encode(format!("{}:{}", email, millis));

        self.store.set_item(keys::ADMIN_TOKEN, &token)?;
        self.store.set_item(keys::ADMIN_EMAIL, email)?;
        self.store
            .set_item(keys::ADMIN_LOGIN_TIME, &millis.to_string())?;

        info!("Admin {} logged in", email);
        Ok(AdminSession {
            email: email.to_string(),
            token,
            logged_in_at: now,
        })
    }

    fn logout(&self) {
        self.clear();
        debug!("Admin session cleared");
    }

    fn current_user(&self) -> Option<String> {
        self.read(keys::ADMIN_EMAIL)
    }

    fn session_time_remaining(&self) -> Option<Duration> {
        let login_time = self.login_time()?;
        let remaining = self.session_duration() - (self.clock.now() - login_time);
        Some(remaining.max(Duration::zero()))
    }
}
