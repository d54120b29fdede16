use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{error, info, trace};

use super::{KeyValueStore, entry_size};
use crate::errors::{InvitelyticsError, Result};

/// JSON 文件存储
///
/// 整个存储是一个 JSON 对象（键 → 字符串值）。每次操作都会重新读取
/// 文件，这样多个进程（比如正在回放事件的 tracker 和管理面板）看到的
/// 是同一份数据；进程之间不加锁，后写入者覆盖先写入者。
pub struct FileStore {
    file_path: PathBuf,
    quota: Option<usize>,
    /// 进程内的读-改-写串行化
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P, quota: Option<usize>) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        // 如果不存在就初始化
        if !file_path.exists() {
            fs::write(&file_path, "{}").map_err(|e| {
                error!("Failed to create store file: {}", e);
                InvitelyticsError::file_operation(format!(
                    "Failed to create store file {}: {}",
                    file_path.display(),
                    e
                ))
            })?;
            info!("Created empty store file: {}", file_path.display());
        }

        Ok(FileStore {
            file_path,
            quota,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!("Store file missing, treating as empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse store file: {}", e);
            InvitelyticsError::serialization(format!(
                "Failed to parse store file {}: {}",
                self.file_path.display(),
                e
            ))
        })
    }

    fn save_to_file(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_from_file()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut data = self.load_from_file()?;

        if let Some(quota) = self.quota {
            let projected: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum::<usize>()
                + entry_size(key, value);
            if projected > quota {
                return Err(InvitelyticsError::quota_exceeded(format!(
                    "writing '{}' needs {} bytes, quota is {}",
                    key, projected, quota
                )));
            }
        }

        data.insert(key.to_string(), value.to_string());
        self.save_to_file(&data)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut data = self.load_from_file()?;
        if data.remove(key).is_some() {
            self.save_to_file(&data)?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
