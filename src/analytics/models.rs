//! 访客数据模型
//!
//! 字段名与浏览器端保存的 JSON 保持一致（camelCase），已有的导出文件
//! 可以直接读回。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// 设备类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// 网络连接信息（Network Information API，并非所有浏览器都提供）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default)]
    pub effective_type: Option<String>,
    #[serde(default)]
    pub downlink: Option<f64>,
    #[serde(default)]
    pub rtt: Option<u32>,
}

/// 从 User-Agent 解析出的浏览器信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// 当前访问的会话快照，每次页面加载时覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSession {
    pub device_type: DeviceType,
    pub user_agent: String,
    pub platform: String,

    pub screen_width: u32,
    pub screen_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub pixel_ratio: f64,

    pub language: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    #[serde(rename = "onLine")]
    pub on_line: bool,

    pub timezone: String,
    pub timestamp: DateTime<Utc>,

    /// 来源页面，直接访问时为 "direct"
    pub referrer: String,
    pub url: String,
    pub path: String,

    #[serde(default)]
    pub connection: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserInfo>,

    pub session_id: String,
    pub visit_count: u64,
}

/// 页面访问记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub referrer: String,
}

/// 点击记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRecord {
    pub timestamp: DateTime<Utc>,
    /// 元素标签名（大写，如 "BUTTON"）
    pub element: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    /// 元素文本，最多 50 个字符
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// 导出快照：管理面板展示、文件下载和数据转发共用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub visitor: Option<VisitorSession>,
    #[serde(default)]
    pub page_views: Vec<PageView>,
    #[serde(default)]
    pub clicks: Vec<ClickRecord>,
    #[serde(default)]
    pub max_scroll_depth: u8,
    #[serde(default)]
    pub time_on_page: u64,
    #[serde(default)]
    pub visit_count: u64,
}

impl AnalyticsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.visitor.is_none()
            && self.page_views.is_empty()
            && self.clicks.is_empty()
            && self.max_scroll_depth == 0
            && self.time_on_page == 0
            && self.visit_count == 0
    }
}

/// 管理面板概览
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub device_type: Option<DeviceType>,
    pub session_id: Option<String>,
    pub page_view_count: usize,
    pub click_count: usize,
    pub max_scroll_depth: u8,
    pub time_on_page: u64,
    pub visit_count: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl From<&AnalyticsSnapshot> for AnalyticsSummary {
    fn from(snapshot: &AnalyticsSnapshot) -> Self {
        let last_page_view = snapshot.page_views.last().map(|v| v.timestamp);
        let last_click = snapshot.clicks.last().map(|c| c.timestamp);

        Self {
            device_type: snapshot.visitor.as_ref().map(|v| v.device_type),
            session_id: snapshot.visitor.as_ref().map(|v| v.session_id.clone()),
            page_view_count: snapshot.page_views.len(),
            click_count: snapshot.clicks.len(),
            max_scroll_depth: snapshot.max_scroll_depth,
            time_on_page: snapshot.time_on_page,
            visit_count: snapshot.visit_count,
            last_activity: last_page_view.max(last_click),
        }
    }
}
