//! 访客数据存储
//!
//! 所有分析数据都保存在一个以字符串为键的 key/value 存储中，
//! 对应浏览器里的 localStorage / sessionStorage。后端通过
//! [`KeyValueStore`] 注入：
//! - `memory`: 进程内存，测试和每个标签页的临时存储
//! - `file`: 单个 JSON 文件，多个进程共享（last write wins）
//! - `null`: 无存储环境，读取总是为空，写入被丢弃

use std::sync::Arc;

use tracing::debug;

use crate::config::{StorageBackendKind, StorageConfig};
use crate::errors::Result;

pub mod file;
pub mod keys;
pub mod memory;
pub mod null;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use null::NullStore;

/// 字符串键值存储
///
/// 接口与 Web Storage 保持一致：值总是字符串，结构化数据由调用方
/// 自行序列化。实现不需要提供事务或跨进程锁。
pub trait KeyValueStore: Send + Sync {
    /// 读取键值，不存在时返回 `Ok(None)`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// 写入键值，超出容量时返回 `QuotaExceeded`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// 删除键，键不存在不算错误
    fn remove_item(&self, key: &str) -> Result<()>;

    /// 后端名称（用于日志）
    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储后端
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
        let quota = (config.quota_bytes > 0).then_some(config.quota_bytes);

        let store: Arc<dyn KeyValueStore> = match config.backend {
            StorageBackendKind::Memory => Arc::new(MemoryStore::with_quota(quota)),
            StorageBackendKind::File => Arc::new(FileStore::open(&config.path, quota)?),
        };

        debug!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }

    /// 每个标签页独立的临时存储（对应 sessionStorage）
    pub fn tab_store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }
}

/// 计算一组键值占用的字节数（与浏览器 quota 的估算方式一致：键 + 值）
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
