use tracing::debug;

use super::KeyValueStore;
use crate::errors::{InvitelyticsError, Result};

/// 无存储环境（对应脚本运行在浏览器之外）
///
/// 读取总是为空，写入失败，删除总是成功。
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        debug!("Using NullStore: analytics data will not be persisted");
        NullStore
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for NullStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<()> {
        Err(InvitelyticsError::storage_unavailable(format!(
            "no storage available for '{}'",
            key
        )))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}
