//! HTTP 接口
//!
//! 只有一个接收端点：记录摘要日志后原样确认，不做持久化。

pub mod services;

pub use services::{AnalyticsService, analytics_routes};
