//! 接收端点的响应结构

use serde::Serialize;

/// 成功接收
#[derive(Debug, Serialize)]
pub struct RelayReceipt {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// 请求体无法处理
#[derive(Debug, Serialize)]
pub struct RelayFailure {
    pub success: bool,
    pub message: String,
    pub error: String,
}

/// `GET` 返回的用法说明
#[derive(Debug, Serialize)]
pub struct EndpointUsage {
    pub message: &'static str,
    pub usage: &'static str,
    pub example: UsageExample,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageExample {
    pub visitor: &'static str,
    pub page_views: &'static str,
    pub clicks: &'static str,
}
