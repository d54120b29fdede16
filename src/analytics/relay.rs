//! 数据转发（可选）
//!
//! 把导出快照 POST 到接收端点。发送在独立的阻塞任务中进行，
//! 调用方拿不到错误，也不需要等待结果；失败只写日志，不重试。

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use ureq::Agent;

use super::models::AnalyticsSnapshot;
use crate::config::AnalyticsConfig;
use crate::errors::{InvitelyticsError, Result};

/// 未配置超时时共用的 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static DEFAULT_AGENT: OnceLock<Agent> = OnceLock::new();

fn default_agent() -> Agent {
    DEFAULT_AGENT
        .get_or_init(|| Agent::config_builder().build().into())
        .clone()
}

/// 接收端点的应答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayAck {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone)]
pub struct RelayClient {
    endpoint: String,
    agent: Agent,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        let agent = match timeout {
            Some(timeout) => Agent::config_builder()
                .timeout_global(Some(timeout))
                .build()
                .into(),
            None => default_agent(),
        };

        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    /// 根据配置创建，未启用时返回 None
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        if !config.relay_enabled || config.relay_endpoint.trim().is_empty() {
            return None;
        }
        Some(Self::new(
            config.relay_endpoint.clone(),
            config.relay_timeout_secs.map(Duration::from_secs),
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 同步发送并解析应答（在阻塞线程中调用）
    pub fn send_blocking(&self, snapshot: &AnalyticsSnapshot) -> Result<RelayAck> {
        let response = self.agent.post(&self.endpoint).send_json(snapshot)?;

        let ack: RelayAck = response.into_body().read_json().map_err(|e| {
            InvitelyticsError::relay(format!(
                "invalid response from \"{}\": {}",
                self.endpoint, e
            ))
        })?;

        if !ack.success {
            return Err(InvitelyticsError::relay(format!(
                "endpoint rejected data: {}",
                ack.message
            )));
        }
        Ok(ack)
    }

    /// 发出即忘
    ///
    /// 返回的 handle 只用于观察结果（测试、日志），丢弃它不会取消发送。
    /// 当前线程没有 tokio runtime 时跳过发送。
    pub fn dispatch(&self, snapshot: AnalyticsSnapshot) -> Option<JoinHandle<bool>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("Analytics relay skipped: no async runtime available");
                return None;
            }
        };

        let client = self.clone();
        Some(runtime.spawn_blocking(move || match client.send_blocking(&snapshot) {
            Ok(ack) => {
                debug!("Analytics relayed to {}: {}", client.endpoint, ack.message);
                true
            }
            Err(e) => {
                warn!("Analytics send error: {}", e);
                false
            }
        }))
    }
}
