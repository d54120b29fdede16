//! 页面事件分发
//!
//! 对应浏览器的 addEventListener / removeEventListener。注册返回
//! [`ListenerRegistration`]，guard 被 drop 时自动注销，组件卸载后不会
//! 留下监听器。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::environment::PageEnvironment;

/// 被点击的元素（以及它的祖先链）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementNode {
    pub tag_name: String,
    pub id: String,
    pub class_name: String,
    pub text_content: Option<String>,
    pub href: Option<String>,
    pub parent: Option<Box<ElementNode>>,
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn inside(mut self, parent: ElementNode) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// 元素自身或最近的祖先链接的 href
    pub fn closest_link_href(&self) -> Option<&str> {
        let mut node = Some(self);
        while let Some(current) = node {
            if let Some(href) = current.href.as_deref()
                && !href.is_empty()
            {
                return Some(href);
            }
            node = current.parent.as_deref();
        }
        None
    }
}

/// 滚动位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    /// window.scrollY
    pub scroll_y: f64,
    /// document.documentElement.scrollHeight
    pub scroll_height: f64,
    /// window.innerHeight
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            scroll_height,
            viewport_height,
        }
    }

    /// 滚动百分比（0-100）
    ///
    /// 页面不可滚动时整页都可见，记为 100。
    pub fn percent(&self) -> u8 {
        let range = self.scroll_height - self.viewport_height;
        if !range.is_finite() || range <= 0.0 {
            return 100;
        }
        let percent = (self.scroll_y / range * 100.0).round();
        if percent.is_nan() {
            return 0;
        }
        percent.clamp(0.0, 100.0) as u8
    }
}

/// 页面事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// 页面加载（挂载 tracker）
    Load { environment: PageEnvironment },
    /// 单页内导航
    Navigate {
        url: String,
        #[serde(default)]
        referrer: String,
    },
    Click { target: ElementNode },
    Scroll { position: ScrollPosition },
    /// beforeunload
    Unload,
}

impl PageEvent {
    pub fn kind(&self) -> PageEventKind {
        match self {
            PageEvent::Load { .. } => PageEventKind::Load,
            PageEvent::Navigate { .. } => PageEventKind::Navigate,
            PageEvent::Click { .. } => PageEventKind::Click,
            PageEvent::Scroll { .. } => PageEventKind::Scroll,
            PageEvent::Unload => PageEventKind::Unload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageEventKind {
    Load,
    Navigate,
    Click,
    Scroll,
    Unload,
}

/// 事件处理器特征
pub trait PageEventHandler: Send + Sync {
    fn handle(&self, event: &PageEvent);

    /// 获取处理器名称
    fn name(&self) -> &str;

    /// 获取感兴趣的事件类型
    fn interested_events(&self) -> Vec<PageEventKind>;
}

type HandlerTable = HashMap<PageEventKind, Vec<(u64, Arc<dyn PageEventHandler>)>>;

/// 页面事件总线
#[derive(Default)]
pub struct PageEventBus {
    handlers: Arc<Mutex<HandlerTable>>,
    next_id: AtomicU64,
}

impl PageEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册事件处理器，返回的 guard 在 drop 时注销
    #[must_use = "dropping the registration removes the listener immediately"]
    pub fn register(&self, handler: Arc<dyn PageEventHandler>) -> ListenerRegistration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let kinds = handler.interested_events();

        {
            let mut handlers = self.handlers.lock();
            for kind in &kinds {
                handlers
                    .entry(*kind)
                    .or_default()
                    .push((id, Arc::clone(&handler)));
            }
        }

        debug!(
            "PageEventBus: registered '{}' for {:?}",
            handler.name(),
            kinds
        );

        ListenerRegistration {
            id,
            kinds,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    /// 分发事件，返回被调用的处理器数量
    pub fn dispatch(&self, event: &PageEvent) -> usize {
        // 先复制一份处理器列表，处理器内部可以安全地注册/注销
        let targets: Vec<Arc<dyn PageEventHandler>> = self
            .handlers
            .lock()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        for handler in &targets {
            trace!("PageEventBus: {:?} -> {}", event.kind(), handler.name());
            handler.handle(event);
        }
        targets.len()
    }

    /// 某类事件当前的监听器数量
    pub fn listener_count(&self, kind: PageEventKind) -> usize {
        self.handlers.lock().get(&kind).map_or(0, Vec::len)
    }
}

/// 监听器注册 guard
pub struct ListenerRegistration {
    id: u64,
    kinds: Vec<PageEventKind>,
    handlers: Weak<Mutex<HandlerTable>>,
}

impl ListenerRegistration {
    /// 显式注销（等价于 drop）
    pub fn unregister(self) {}
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        let Some(handlers) = self.handlers.upgrade() else {
            return;
        };
        let mut handlers = handlers.lock();
        for kind in &self.kinds {
            if let Some(list) = handlers.get_mut(kind) {
                list.retain(|(id, _)| *id != self.id);
                if list.is_empty() {
                    handlers.remove(kind);
                }
            }
        }
        trace!("PageEventBus: listener {} removed", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingHandler {
        seen: AtomicUsize,
    }

    impl PageEventHandler for CountingHandler {
        fn handle(&self, _event: &PageEvent) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn interested_events(&self) -> Vec<PageEventKind> {
            vec![PageEventKind::Click, PageEventKind::Unload]
        }
    }

    #[test]
    fn test_registration_is_scoped() {
        let bus = PageEventBus::new();
        let handler = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        });

        {
            let _registration = bus.register(handler.clone());
            assert_eq!(bus.listener_count(PageEventKind::Click), 1);
            assert_eq!(bus.dispatch(&PageEvent::Unload), 1);
            // 不关心的事件不会送达
            let scroll = PageEvent::Scroll {
                position: ScrollPosition::new(0.0, 100.0, 50.0),
            };
            assert_eq!(bus.dispatch(&scroll), 0);
        }

        assert_eq!(bus.listener_count(PageEventKind::Click), 0);
        assert_eq!(bus.listener_count(PageEventKind::Unload), 0);
        assert_eq!(bus.dispatch(&PageEvent::Unload), 0);
        assert_eq!(handler.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_outlives_bus() {
        let bus = PageEventBus::new();
        let registration = bus.register(Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        }));
        drop(bus);
        registration.unregister();
    }

    #[test]
    fn test_scroll_percent() {
        assert_eq!(ScrollPosition::new(0.0, 2000.0, 1000.0).percent(), 0);
        assert_eq!(ScrollPosition::new(500.0, 2000.0, 1000.0).percent(), 50);
        assert_eq!(ScrollPosition::new(1000.0, 2000.0, 1000.0).percent(), 100);
        // iOS 回弹可能超出范围
        assert_eq!(ScrollPosition::new(1100.0, 2000.0, 1000.0).percent(), 100);
        assert_eq!(ScrollPosition::new(-40.0, 2000.0, 1000.0).percent(), 0);
        assert_eq!(ScrollPosition::new(0.0, 800.0, 1000.0).percent(), 100);
        assert_eq!(ScrollPosition::new(333.0, 2000.0, 1000.0).percent(), 33);
    }

    #[test]
    fn test_closest_link_href() {
        let link = ElementNode::new("A").with_href("https://maps.example.com");
        let icon = ElementNode::new("SVG").inside(ElementNode::new("SPAN").inside(link));
        assert_eq!(icon.closest_link_href(), Some("https://maps.example.com"));
        assert_eq!(ElementNode::new("DIV").closest_link_href(), None);
    }

    #[test]
    fn test_page_event_json() {
        let event: PageEvent = serde_json::from_str(
            r#"{"type":"click","target":{"tagName":"button","id":"rsvp","textContent":"RSVP now"}}"#,
        )
        .unwrap();
        match event {
            PageEvent::Click { target } => {
                assert_eq!(target.tag_name, "button");
                assert_eq!(target.id, "rsvp");
                assert_eq!(target.class_name, "");
            }
            other => panic!("unexpected event {:?}", other),
        }

        let unload: PageEvent = serde_json::from_str(r#"{"type":"unload"}"#).unwrap();
        assert_eq!(unload.kind(), PageEventKind::Unload);
    }
}
