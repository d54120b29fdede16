//! 访客分析
//!
//! 采集端（[`capture::Tracker`]）把页面事件写入键值存储，
//! 读取端（[`accessor::AnalyticsReader`]）从同一份存储读出、导出和清除。
//! 两端之间没有其他通道，存储就是唯一的数据源。

pub mod accessor;
pub mod capture;
pub mod clock;
pub mod device;
pub mod environment;
pub mod events;
pub mod models;
pub mod relay;
pub mod replay;
pub mod session;
pub mod validation;

pub use accessor::{AnalyticsReader, export_file_name};
pub use capture::Tracker;
pub use clock::{Clock, ManualClock, SystemClock};
pub use environment::PageEnvironment;
pub use events::{ElementNode, ListenerRegistration, PageEvent, PageEventBus, ScrollPosition};
pub use models::{
    AnalyticsSnapshot, AnalyticsSummary, BrowserInfo, ClickRecord, ConnectionInfo, DeviceType,
    PageView, VisitorSession,
};
pub use relay::{RelayAck, RelayClient};
pub use replay::{ReplayStats, Replayer};
pub use validation::{ValidationIssue, validate_snapshot};

/// 页面访问列表的容量
pub const MAX_PAGE_VIEWS: usize = 50;
/// 点击列表的容量
pub const MAX_CLICKS: usize = 100;
/// 点击文本最多保留的字符数
pub const CLICK_TEXT_LIMIT: usize = 50;
