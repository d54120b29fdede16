//! 访客行为采集
//!
//! [`Tracker`] 把页面事件转换成五类记录写入存储：
//! - 会话快照（每次加载覆盖）
//! - 页面访问（最多保留 50 条）
//! - 点击（最多保留 100 条）
//! - 最大滚动深度（只增不减）
//! - 停留时间（卸载时写入）
//!
//! 所有写入都是尽力而为，存储写满或不可用时静默丢弃。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::accessor::{AnalyticsReader, read_json, write_json, write_raw};
use super::clock::{Clock, SystemClock};
use super::device::{classify_device, parse_browser};
use super::environment::PageEnvironment;
use super::events::{
    ElementNode, ListenerRegistration, PageEvent, PageEventBus, PageEventHandler, PageEventKind,
    ScrollPosition,
};
use super::models::{ClickRecord, PageView, VisitorSession};
use super::relay::RelayClient;
use super::session::{next_visit_count, session_id};
use super::{CLICK_TEXT_LIMIT, MAX_CLICKS, MAX_PAGE_VIEWS};
use crate::storage::{KeyValueStore, keys};

/// 追加到有界列表，超出容量时从头部淘汰
pub fn push_bounded<T>(list: &mut Vec<T>, item: T, capacity: usize) {
    list.push(item);
    if list.len() > capacity {
        let overflow = list.len() - capacity;
        list.drain(..overflow);
    }
}

/// 按字符截断（不会切断多字节字符）
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// 从点击目标构建记录
pub fn click_record(target: &ElementNode, timestamp: DateTime<Utc>) -> ClickRecord {
    ClickRecord {
        timestamp,
        element: target.tag_name.to_ascii_uppercase(),
        id: non_empty(&target.id),
        class_name: non_empty(&target.class_name),
        text: target
            .text_content
            .as_deref()
            .map(|text| truncate_chars(text, CLICK_TEXT_LIMIT))
            .filter(|text| !text.is_empty()),
        href: target.closest_link_href().map(str::to_string),
    }
}

/// 每次挂载的内存状态
struct TrackerState {
    start_time: DateTime<Utc>,
    max_scroll: u8,
    current_url: String,
}

pub struct Tracker {
    store: Arc<dyn KeyValueStore>,
    tab_store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    relay: Option<RelayClient>,
    state: Mutex<TrackerState>,
}

impl Tracker {
    /// `store` 对应 localStorage，`tab_store` 对应当前标签页的 sessionStorage
    pub fn new(store: Arc<dyn KeyValueStore>, tab_store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            tab_store,
            clock: Arc::new(SystemClock),
            relay: None,
            state: Mutex::new(TrackerState {
                start_time: Utc::now(),
                max_scroll: 0,
                current_url: String::new(),
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state.get_mut().start_time = clock.now();
        self.clock = clock;
        self
    }

    pub fn with_relay(mut self, relay: Option<RelayClient>) -> Self {
        self.relay = relay;
        self
    }

    /// 读取同一份存储的 accessor
    pub fn reader(&self) -> AnalyticsReader {
        AnalyticsReader::new(Arc::clone(&self.store)).with_tab_store(Arc::clone(&self.tab_store))
    }

    /// 页面加载：记录会话快照和一次页面访问，重置计时
    pub fn initialize(&self, env: &PageEnvironment) -> VisitorSession {
        let session = self.capture_visitor(env);

        {
            let mut state = self.state.lock();
            state.start_time = self.clock.now();
            state.max_scroll = self.reader().max_scroll_depth();
            state.current_url = env.url.clone();
        }

        self.record_page_view(&env.url, &env.referrer);

        if let Some(relay) = &self.relay {
            // 结果只进日志，这里不等待
            let _ = relay.dispatch(self.reader().export());
        }

        debug!(
            "Tracker initialized: session={}, visit={}, device={}",
            session.session_id, session.visit_count, session.device_type
        );
        session
    }

    /// 采集并保存会话快照
    pub fn capture_visitor(&self, env: &PageEnvironment) -> VisitorSession {
        let session = VisitorSession {
            device_type: classify_device(&env.user_agent),
            user_agent: env.user_agent.clone(),
            platform: env.platform.clone(),
            screen_width: env.screen_width,
            screen_height: env.screen_height,
            viewport_width: env.viewport_width,
            viewport_height: env.viewport_height,
            pixel_ratio: env.pixel_ratio,
            language: env.language.clone(),
            languages: env.languages.clone(),
            cookie_enabled: env.cookie_enabled,
            on_line: env.on_line,
            timezone: env.timezone.clone(),
            timestamp: self.clock.now(),
            referrer: env.referrer_or_direct(),
            url: env.url.clone(),
            path: env.path(),
            connection: env.connection.clone(),
            browser: parse_browser(&env.user_agent),
            session_id: session_id(self.tab_store.as_ref(), self.clock.as_ref()),
            visit_count: next_visit_count(self.store.as_ref()),
        };

        write_json(self.store.as_ref(), keys::VISITOR_SESSION, &session);
        session
    }

    pub fn record_page_view(&self, url: &str, referrer: &str) -> PageView {
        let view = PageView {
            timestamp: self.clock.now(),
            url: url.to_string(),
            referrer: referrer.to_string(),
        };
        self.append(keys::PAGE_VIEWS, view.clone(), MAX_PAGE_VIEWS);
        view
    }

    /// 单页内导航，来源为空时使用上一个地址
    pub fn navigate(&self, url: &str, referrer: &str) -> PageView {
        let previous = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.current_url, url.to_string())
        };
        let referrer = if referrer.is_empty() {
            previous.as_str()
        } else {
            referrer
        };
        self.record_page_view(url, referrer)
    }

    pub fn record_click(&self, target: &ElementNode) -> ClickRecord {
        let click = click_record(target, self.clock.now());
        trace!("Click captured on {}", click.element);
        self.append(keys::CLICKS, click.clone(), MAX_CLICKS);
        click
    }

    /// 更新滚动深度，返回当前最大值
    ///
    /// 与存储中的最大值比较，其他标签页记录的更大值不会被覆盖。
    pub fn track_scroll(&self, position: ScrollPosition) -> u8 {
        let percent = position.percent();
        let stored = self.reader().max_scroll_depth();
        let mut state = self.state.lock();
        state.max_scroll = state.max_scroll.max(stored);
        if percent > state.max_scroll {
            state.max_scroll = percent;
            write_raw(
                self.store.as_ref(),
                keys::MAX_SCROLL_DEPTH,
                &percent.to_string(),
            );
        }
        state.max_scroll
    }

    /// 页面卸载时记录停留秒数
    pub fn record_time_on_page(&self) -> u64 {
        let start = self.state.lock().start_time;
        let elapsed_ms = (self.clock.now() - start).num_milliseconds().max(0);
        let seconds = (elapsed_ms as f64 / 1000.0).round() as u64;
        write_raw(self.store.as_ref(), keys::TIME_ON_PAGE, &seconds.to_string());
        seconds
    }

    /// 初始化并注册事件监听，guard 被 drop 即卸载
    pub fn mount(
        self: &Arc<Self>,
        bus: &PageEventBus,
        env: &PageEnvironment,
    ) -> ListenerRegistration {
        self.initialize(env);
        bus.register(Arc::clone(self) as Arc<dyn PageEventHandler>)
    }

    fn append<T>(&self, key: &str, item: T, capacity: usize)
    where
        T: Serialize + DeserializeOwned,
    {
        let mut list: Vec<T> = read_json(self.store.as_ref(), key).unwrap_or_default();
        push_bounded(&mut list, item, capacity);
        write_json(self.store.as_ref(), key, &list);
    }
}

impl PageEventHandler for Tracker {
    fn handle(&self, event: &PageEvent) {
        match event {
            PageEvent::Load { environment } => {
                self.initialize(environment);
            }
            PageEvent::Navigate { url, referrer } => {
                self.navigate(url, referrer);
            }
            PageEvent::Click { target } => {
                self.record_click(target);
            }
            PageEvent::Scroll { position } => {
                self.track_scroll(*position);
            }
            PageEvent::Unload => {
                self.record_time_on_page();
            }
        }
    }

    fn name(&self) -> &str {
        "analytics-tracker"
    }

    fn interested_events(&self) -> Vec<PageEventKind> {
        vec![
            PageEventKind::Navigate,
            PageEventKind::Click,
            PageEventKind::Scroll,
            PageEventKind::Unload,
        ]
    }
}
