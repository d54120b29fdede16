use dashmap::DashMap;
use tracing::trace;

use super::{KeyValueStore, entry_size};
use crate::errors::{InvitelyticsError, Result};

/// 内存存储
///
/// 可选的 quota 用来模拟浏览器存储写满的情况。
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: Option<usize>) -> Self {
        Self {
            data: DashMap::new(),
            quota,
        }
    }

    /// 当前占用字节数
    pub fn used_bytes(&self) -> usize {
        self.data
            .iter()
            .map(|entry| entry_size(entry.key(), entry.value()))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .data
                .iter()
                .filter(|entry| entry.key() != key)
                .map(|entry| entry_size(entry.key(), entry.value()))
                .sum();
            let projected = others + entry_size(key, value);
            if projected > quota {
                return Err(InvitelyticsError::quota_exceeded(format!(
                    "writing '{}' needs {} bytes, quota is {}",
                    key, projected, quota
                )));
            }
        }

        trace!("MemoryStore: set {}", key);
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
