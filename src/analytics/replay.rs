//! 页面事件回放
//!
//! 把录制好的事件序列（每行一个 JSON）送入采集流程，效果等同于
//! 同一个标签页依次经历这些事件。`load` 事件会卸载上一页的监听并重新挂载。

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, warn};

use super::capture::Tracker;
use super::events::{ListenerRegistration, PageEvent, PageEventBus};
use crate::errors::{InvitelyticsError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// 页面加载次数
    pub loads: usize,
    /// 送达 tracker 的其他事件
    pub dispatched: usize,
    /// 第一次加载之前的事件（没有挂载的 tracker）
    pub skipped: usize,
    /// 无法解析的行
    pub invalid: usize,
}

pub struct Replayer {
    tracker: Arc<Tracker>,
    bus: PageEventBus,
    mounted: Option<ListenerRegistration>,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new(tracker: Arc<Tracker>) -> Self {
        Self {
            tracker,
            bus: PageEventBus::new(),
            mounted: None,
            stats: ReplayStats::default(),
        }
    }

    pub fn feed(&mut self, event: &PageEvent) {
        match event {
            PageEvent::Load { environment } => {
                // 先卸载上一页，再挂载新页面
                self.mounted = None;
                self.mounted = Some(self.tracker.mount(&self.bus, environment));
                self.stats.loads += 1;
            }
            other => {
                if self.bus.dispatch(other) == 0 {
                    debug!("Replay: {:?} before any page load, skipped", other.kind());
                    self.stats.skipped += 1;
                } else {
                    self.stats.dispatched += 1;
                }
            }
        }
    }

    /// 解析并回放一行，空行忽略
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<PageEvent>(line) {
            Ok(event) => {
                self.feed(&event);
                Ok(())
            }
            Err(e) => {
                self.stats.invalid += 1;
                Err(InvitelyticsError::validation(format!(
                    "invalid page event: {}",
                    e
                )))
            }
        }
    }

    /// 回放整个输入，坏行记录日志后跳过
    pub fn feed_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if let Err(e) = self.feed_line(&line) {
                warn!("Replay line {}: {}", number + 1, e);
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// 结束回放并卸载监听
    pub fn finish(self) -> ReplayStats {
        self.stats
    }
}
