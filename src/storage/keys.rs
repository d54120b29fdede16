//! 存储键名
//!
//! 与浏览器端保持一致，导出文件和已有数据都依赖这些名称。

pub const VISITOR_SESSION: &str = "visitor_session";
pub const PAGE_VIEWS: &str = "page_views";
pub const CLICKS: &str = "clicks";
pub const MAX_SCROLL_DEPTH: &str = "max_scroll_depth";
pub const TIME_ON_PAGE: &str = "time_on_page";
pub const VISIT_COUNT: &str = "visit_count";

/// 每个标签页的会话 ID（保存在 tab store 中）
pub const SESSION_ID: &str = "session_id";

pub const ADMIN_TOKEN: &str = "admin_token";
pub const ADMIN_EMAIL: &str = "admin_email";
pub const ADMIN_LOGIN_TIME: &str = "admin_login_time";

/// "清除数据" 需要删除的全部分析数据键
pub const ANALYTICS_KEYS: [&str; 6] = [
    VISITOR_SESSION,
    PAGE_VIEWS,
    CLICKS,
    MAX_SCROLL_DEPTH,
    TIME_ON_PAGE,
    VISIT_COUNT,
];

pub const ADMIN_KEYS: [&str; 3] = [ADMIN_TOKEN, ADMIN_EMAIL, ADMIN_LOGIN_TIME];
