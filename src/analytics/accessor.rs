//! 数据读取、导出与清除
//!
//! 所有读取都有确定的默认值：键不存在、存储不可用或者 JSON 损坏时
//! 分别返回 None / 空列表 / 0，不会报错。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::models::{AnalyticsSnapshot, AnalyticsSummary, ClickRecord, PageView, VisitorSession};
use super::session::parse_counter;
use crate::errors::Result;
use crate::storage::{KeyValueStore, NullStore, keys};

/// 读取 JSON 值，缺失或无法解析时返回 None
pub(crate) fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            debug!("Analytics read of '{}' failed: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed analytics data in '{}': {}", key, e);
            None
        }
    }
}

/// 写入 JSON 值，失败时只记录日志
pub(crate) fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to serialize analytics data for '{}': {}", key, e);
            return;
        }
    };
    write_raw(store, key, &raw);
}

pub(crate) fn write_raw(store: &dyn KeyValueStore, key: &str, raw: &str) {
    if let Err(e) = store.set_item(key, raw) {
        debug!("Analytics write to '{}' dropped: {}", key, e);
    }
}

fn read_counter(store: &dyn KeyValueStore, key: &str) -> u64 {
    parse_counter(store.get_item(key).ok().flatten())
}

/// 导出文件名：`analytics-data-2025-06-01T10-00-00.json`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("analytics-data-{}.json", at.format("%Y-%m-%dT%H-%M-%S"))
}

#[derive(Clone)]
pub struct AnalyticsReader {
    store: Arc<dyn KeyValueStore>,
    tab_store: Option<Arc<dyn KeyValueStore>>,
}

impl AnalyticsReader {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            tab_store: None,
        }
    }

    /// 同时持有标签页存储，清除时一并删除会话 ID
    pub fn with_tab_store(mut self, tab_store: Arc<dyn KeyValueStore>) -> Self {
        self.tab_store = Some(tab_store);
        self
    }

    /// 没有任何存储可用（脚本运行在浏览器之外）
    pub fn unavailable() -> Self {
        Self::new(Arc::new(NullStore::new()))
    }

    pub fn visitor_session(&self) -> Option<VisitorSession> {
        read_json(self.store.as_ref(), keys::VISITOR_SESSION)
    }

    pub fn page_views(&self) -> Vec<PageView> {
        read_json(self.store.as_ref(), keys::PAGE_VIEWS).unwrap_or_default()
    }

    pub fn clicks(&self) -> Vec<ClickRecord> {
        read_json(self.store.as_ref(), keys::CLICKS).unwrap_or_default()
    }

    pub fn max_scroll_depth(&self) -> u8 {
        read_counter(self.store.as_ref(), keys::MAX_SCROLL_DEPTH).min(100) as u8
    }

    pub fn time_on_page(&self) -> u64 {
        read_counter(self.store.as_ref(), keys::TIME_ON_PAGE)
    }

    pub fn visit_count(&self) -> u64 {
        read_counter(self.store.as_ref(), keys::VISIT_COUNT)
    }

    /// 汇总全部数据
    pub fn export(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            visitor: self.visitor_session(),
            page_views: self.page_views(),
            clicks: self.clicks(),
            max_scroll_depth: self.max_scroll_depth(),
            time_on_page: self.time_on_page(),
            visit_count: self.visit_count(),
        }
    }

    pub fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary::from(&self.export())
    }

    /// 导出为格式化的 JSON 字符串
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// 导出到文件；`dir` 为目录时使用带时间戳的文件名
    pub fn export_to_file(&self, target: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = if target.is_dir() {
            target.join(export_file_name(now))
        } else {
            target.to_path_buf()
        };

        std::fs::write(&path, self.export_json()?)?;
        info!("Analytics data exported to {}", path.display());
        Ok(path)
    }

    /// 清除全部分析数据和会话 ID
    ///
    /// 总是成功：键不存在视为已清除，删除失败只记录日志。
    pub fn clear(&self) {
        for key in keys::ANALYTICS_KEYS {
            if let Err(e) = self.store.remove_item(key) {
                warn!("Failed to clear '{}': {}", key, e);
            }
        }

        if let Some(tab_store) = &self.tab_store
            && let Err(e) = tab_store.remove_item(keys::SESSION_ID)
        {
            warn!("Failed to clear session id: {}", e);
        }

        info!("Analytics data cleared ({} backend)", self.store.backend_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_export_file_name() {
        let at: DateTime<Utc> = "2025-06-01T10:04:05Z".parse().unwrap();
        assert_eq!(export_file_name(at), "analytics-data-2025-06-01T10-04-05.json");
    }

    #[test]
    fn test_scroll_depth_clamped_on_read() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(keys::MAX_SCROLL_DEPTH, "250").unwrap();
        let reader = AnalyticsReader::new(store);
        assert_eq!(reader.max_scroll_depth(), 100);
    }
}
