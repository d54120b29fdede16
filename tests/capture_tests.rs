//! Capture pipeline tests
//!
//! Drive the tracker the way a page would and read the results back
//! through the accessor.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use invitelytics::analytics::events::PageEventKind;
use invitelytics::analytics::{
    AnalyticsReader, DeviceType, ElementNode, ManualClock, PageEnvironment, PageEvent,
    PageEventBus, ScrollPosition, Tracker,
};
use invitelytics::storage::{KeyValueStore, MemoryStore, keys};

// =============================================================================
// Test Setup
// =============================================================================

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn start() -> DateTime<Utc> {
    "2025-06-01T10:00:00Z".parse().unwrap()
}

struct Page {
    store: Arc<MemoryStore>,
    tab: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
}

impl Page {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            tab: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::new(start())),
        }
    }

    /// 同一个标签页中的 tracker
    fn tracker(&self) -> Tracker {
        Tracker::new(self.store.clone(), self.tab.clone()).with_clock(self.clock.clone())
    }

    /// 新标签页：共享持久存储，会话存储独立
    fn new_tab_tracker(&self) -> Tracker {
        Tracker::new(self.store.clone(), Arc::new(MemoryStore::new()))
            .with_clock(self.clock.clone())
    }

    fn reader(&self) -> AnalyticsReader {
        AnalyticsReader::new(self.store.clone())
    }
}

fn env(url: &str) -> PageEnvironment {
    PageEnvironment::new(url, DESKTOP_UA)
        .with_screen(1920, 1080)
        .with_viewport(1440, 900)
}

// =============================================================================
// Ring buffers
// =============================================================================

#[test]
fn test_click_list_keeps_most_recent_hundred() {
    let page = Page::new();
    let tracker = page.tracker();
    tracker.initialize(&env("https://example.com/"));

    for i in 0..120 {
        page.clock.advance(Duration::seconds(1));
        tracker.record_click(&ElementNode::new("button").with_id(format!("b{}", i)));
    }

    let clicks = page.reader().clicks();
    assert_eq!(clicks.len(), 100);
    assert_eq!(clicks[0].id.as_deref(), Some("b20"));
    assert_eq!(clicks[99].id.as_deref(), Some("b119"));
    assert!(clicks.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_page_view_list_keeps_most_recent_fifty() {
    let page = Page::new();
    let tracker = page.tracker();

    for i in 0..60 {
        page.clock.advance(Duration::seconds(1));
        tracker.initialize(&env(&format!("https://example.com/?load={}", i)));
    }

    let views = page.reader().page_views();
    assert_eq!(views.len(), 50);
    assert_eq!(views[0].url, "https://example.com/?load=10");
    assert_eq!(views[49].url, "https://example.com/?load=59");
}

// =============================================================================
// Session and visits
// =============================================================================

#[test]
fn test_three_loads_count_three_visits() {
    let page = Page::new();
    let tracker = page.tracker();

    let mut counts = Vec::new();
    for _ in 0..3 {
        counts.push(tracker.initialize(&env("https://example.com/")).visit_count);
    }

    assert_eq!(counts, vec![1, 2, 3]);
    assert_eq!(page.reader().visit_count(), 3);
}

#[test]
fn test_visit_count_continues_from_previous_value() {
    let page = Page::new();
    page.store.set_item(keys::VISIT_COUNT, "7").unwrap();

    let tracker = page.tracker();
    for _ in 0..4 {
        tracker.initialize(&env("https://example.com/"));
    }
    assert_eq!(page.reader().visit_count(), 11);
}

#[test]
fn test_session_id_stable_within_tab_distinct_across_tabs() {
    let page = Page::new();
    let first = page.tracker().initialize(&env("https://example.com/"));
    let reload = page.tracker().initialize(&env("https://example.com/"));
    let other_tab = page.new_tab_tracker().initialize(&env("https://example.com/"));

    assert_eq!(first.session_id, reload.session_id);
    assert_ne!(first.session_id, other_tab.session_id);
    assert!(first.session_id.starts_with("session_1748772000000_"));
}

#[test]
fn test_visitor_session_snapshot() {
    let page = Page::new();
    let session = page.tracker().initialize(
        &PageEnvironment::new("https://example.com/rsvp?guest=1", IPHONE_UA).with_screen(390, 844),
    );

    assert_eq!(session.device_type, DeviceType::Mobile);
    assert_eq!(session.path, "/rsvp");
    assert_eq!(session.referrer, "direct");
    assert_eq!(session.screen_width, 390);

    let stored = page.reader().visitor_session().unwrap();
    assert_eq!(stored, session);
}

// =============================================================================
// Scroll and time on page
// =============================================================================

#[test]
fn test_scroll_depth_never_decreases() {
    let page = Page::new();
    let tracker = page.tracker();
    tracker.initialize(&env("https://example.com/"));

    let positions = [600.0, 200.0, 1500.0, 0.0, 900.0];
    let mut last = 0;
    for y in positions {
        let depth = tracker.track_scroll(ScrollPosition::new(y, 3000.0, 1000.0));
        assert!(depth >= last);
        last = depth;
    }

    assert_eq!(last, 75);
    assert_eq!(page.reader().max_scroll_depth(), 75);
}

#[test]
fn test_scroll_maximum_survives_reload() {
    let page = Page::new();
    let tracker = page.tracker();
    tracker.initialize(&env("https://example.com/"));
    tracker.track_scroll(ScrollPosition::new(2000.0, 3000.0, 1000.0));

    tracker.initialize(&env("https://example.com/"));
    tracker.track_scroll(ScrollPosition::new(500.0, 3000.0, 1000.0));
    assert_eq!(page.reader().max_scroll_depth(), 100);
}

#[test]
fn test_lower_scroll_never_overwrites_stored_maximum() {
    let page = Page::new();
    page.store.set_item(keys::MAX_SCROLL_DEPTH, "80").unwrap();

    // 未初始化的 tracker
    let fresh = page.tracker();
    assert_eq!(fresh.track_scroll(ScrollPosition::new(600.0, 3000.0, 1000.0)), 80);
    assert_eq!(page.reader().max_scroll_depth(), 80);

    // 两个标签页共享存储
    let tab_a = page.tracker();
    let tab_b = page.new_tab_tracker();
    tab_a.initialize(&env("https://example.com/"));
    tab_b.initialize(&env("https://example.com/"));
    tab_a.track_scroll(ScrollPosition::new(1800.0, 3000.0, 1000.0));
    assert_eq!(page.reader().max_scroll_depth(), 90);
    assert_eq!(tab_b.track_scroll(ScrollPosition::new(600.0, 3000.0, 1000.0)), 90);
    assert_eq!(page.store.get_item(keys::MAX_SCROLL_DEPTH).unwrap().as_deref(), Some("90"));
}

#[test]
fn test_time_on_page_rounds_to_seconds() {
    let page = Page::new();
    let tracker = page.tracker();
    tracker.initialize(&env("https://example.com/"));

    page.clock.advance(Duration::milliseconds(42_600));
    assert_eq!(tracker.record_time_on_page(), 43);
    assert_eq!(page.reader().time_on_page(), 43);

    // 重新加载后重新计时
    tracker.initialize(&env("https://example.com/"));
    page.clock.advance(Duration::milliseconds(1_400));
    assert_eq!(tracker.record_time_on_page(), 1);
}

// =============================================================================
// Clicks
// =============================================================================

#[test]
fn test_click_text_truncated_and_ancestor_link_used() {
    let page = Page::new();
    let tracker = page.tracker();
    tracker.initialize(&env("https://example.com/"));

    let long_text = "Join us for dinner and dancing under the stars at the old orchard";
    let target = ElementNode::new("span")
        .with_class("label")
        .with_text(long_text)
        .inside(ElementNode::new("a").with_href("https://maps.example.com/orchard"));

    let click = tracker.record_click(&target);
    assert_eq!(click.element, "SPAN");
    assert_eq!(click.text.as_deref().map(|t| t.chars().count()), Some(50));
    assert!(long_text.starts_with(click.text.as_deref().unwrap()));
    assert_eq!(click.href.as_deref(), Some("https://maps.example.com/orchard"));
    assert_eq!(click.class_name.as_deref(), Some("label"));
    assert_eq!(click.id, None);
}

// =============================================================================
// Storage failures
// =============================================================================

#[test]
fn test_full_store_drops_writes_silently() {
    let store = Arc::new(MemoryStore::with_quota(Some(64)));
    let tracker = Tracker::new(store.clone(), Arc::new(MemoryStore::new()));

    let session = tracker.initialize(&env("https://example.com/"));
    assert_eq!(session.visit_count, 1);
    for _ in 0..10 {
        tracker.record_click(&ElementNode::new("button").with_text("RSVP"));
    }

    let reader = AnalyticsReader::new(store);
    assert!(reader.visitor_session().is_none());
    assert!(reader.clicks().is_empty());
}

// =============================================================================
// Listener lifecycle
// =============================================================================

#[test]
fn test_mount_registers_and_drop_unregisters() {
    let page = Page::new();
    let tracker = Arc::new(page.tracker());
    let bus = PageEventBus::new();

    let registration = tracker.mount(&bus, &env("https://example.com/"));
    assert_eq!(bus.listener_count(PageEventKind::Click), 1);

    bus.dispatch(&PageEvent::Click {
        target: ElementNode::new("button"),
    });
    bus.dispatch(&PageEvent::Navigate {
        url: "https://example.com/#gallery".to_string(),
        referrer: String::new(),
    });
    page.clock.advance(Duration::seconds(30));
    bus.dispatch(&PageEvent::Unload);

    drop(registration);
    assert_eq!(bus.listener_count(PageEventKind::Click), 0);
    assert_eq!(
        bus.dispatch(&PageEvent::Click {
            target: ElementNode::new("button"),
        }),
        0
    );

    let snapshot = page.reader().export();
    assert_eq!(snapshot.clicks.len(), 1);
    assert_eq!(snapshot.page_views.len(), 2);
    assert_eq!(snapshot.page_views[1].referrer, "https://example.com/");
    assert_eq!(snapshot.time_on_page, 30);
}

#[test]
fn test_capture_round_trip_is_lossless() {
    let page = Page::new();
    let tracker = page.tracker();
    let session = tracker.initialize(&env("https://example.com/").with_referrer("https://t.co/x"));
    let click = tracker.record_click(&ElementNode::new("a").with_href("https://example.com/cal.ics"));
    tracker.track_scroll(ScrollPosition::new(450.0, 1900.0, 900.0));

    let snapshot = page.reader().export();
    assert_eq!(snapshot.visitor.as_ref(), Some(&session));
    assert_eq!(snapshot.clicks, vec![click]);
    assert_eq!(snapshot.max_scroll_depth, 45);
    assert_eq!(snapshot.page_views[0].referrer, "https://t.co/x");

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: invitelytics::analytics::AnalyticsSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}
