//! User-Agent 解析
//!
//! 设备类型沿用页面脚本的判断规则（关键字匹配），浏览器和系统信息
//! 交给 woothee 解析。

use woothee::parser::Parser;

use super::models::{BrowserInfo, DeviceType};

const MOBILE_MARKERS: [&str; 4] = ["Mobile", "Android", "iPhone", "iPad"];
const TABLET_MARKERS: [&str; 2] = ["Tablet", "iPad"];

/// 根据 User-Agent 判断设备类型
///
/// 移动端关键字优先匹配，所以 iPad 会被归为 mobile。
pub fn classify_device(user_agent: &str) -> DeviceType {
    if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
        DeviceType::Mobile
    } else if TABLET_MARKERS.iter().any(|m| user_agent.contains(m)) {
        DeviceType::Tablet
    } else {
        DeviceType::Desktop
    }
}

/// 解析浏览器 / 系统信息，完全无法识别时返回 None
pub fn parse_browser(user_agent: &str) -> Option<BrowserInfo> {
    if user_agent.trim().is_empty() {
        return None;
    }

    let parser = Parser::new();
    let result = parser.parse(user_agent)?;

    let known = |s: &str| (!s.is_empty() && s != "UNKNOWN").then(|| s.to_string());

    let info = BrowserInfo {
        name: known(&*result.name),
        version: known(&*result.version),
        os: known(&*result.os),
        os_version: known(&*result.os_version),
        category: known(&*result.category),
    };

    if info.name.is_none() && info.os.is_none() {
        None
    } else {
        Some(info)
    }
}
