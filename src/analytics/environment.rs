//! 页面运行环境
//!
//! 浏览器里这些值来自 navigator / screen / window / Intl，这里作为
//! 输入传给 tracker，调用方负责采集。

use serde::{Deserialize, Serialize};

use super::models::ConnectionInfo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageEnvironment {
    pub user_agent: String,
    pub platform: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub pixel_ratio: f64,
    pub language: String,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub on_line: bool,
    pub timezone: String,
    /// document.referrer，直接访问时为空
    pub referrer: String,
    /// window.location.href
    pub url: String,
    pub connection: Option<ConnectionInfo>,
}

impl Default for PageEnvironment {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            platform: String::new(),
            screen_width: 0,
            screen_height: 0,
            viewport_width: 0,
            viewport_height: 0,
            pixel_ratio: 1.0,
            language: "en-US".to_string(),
            languages: Vec::new(),
            cookie_enabled: true,
            on_line: true,
            timezone: "UTC".to_string(),
            referrer: String::new(),
            url: String::new(),
            connection: None,
        }
    }
}

impl PageEnvironment {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// URL 的 path 部分，无法解析时退回 "/"
    pub fn path(&self) -> String {
        url::Url::parse(&self.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| {
                if self.url.starts_with('/') {
                    self.url
                        .split(['?', '#'])
                        .next()
                        .unwrap_or("/")
                        .to_string()
                } else {
                    "/".to_string()
                }
            })
    }

    /// 会话快照里保存的来源，为空时记为 "direct"
    pub fn referrer_or_direct(&self) -> String {
        if self.referrer.is_empty() {
            "direct".to_string()
        } else {
            self.referrer.clone()
        }
    }
}
