//! 采集路径性能基准测试

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use invitelytics::analytics::{ElementNode, PageEnvironment, ScrollPosition, Tracker};
use invitelytics::storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;

fn create_tracker() -> Tracker {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let tracker = Tracker::new(store, Arc::new(MemoryStore::new()));
    tracker.initialize(&PageEnvironment::new(
        "https://example.com/",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36",
    ));
    tracker
}

fn button() -> ElementNode {
    ElementNode::new("button")
        .with_id("rsvp")
        .with_class("btn btn-primary")
        .with_text("RSVP for the celebration on Saturday evening at the garden venue")
}

/// 点击列表已满（每次写入都要淘汰最旧的一条）
fn bench_record_click_at_capacity(c: &mut Criterion) {
    let tracker = create_tracker();
    let target = button();
    for _ in 0..100 {
        tracker.record_click(&target);
    }

    c.bench_function("record_click/at_capacity", |b| {
        b.iter(|| tracker.record_click(&target));
    });
}

/// 不同列表长度下的点击写入
fn bench_record_click_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_click/fill");
    let target = button();

    for existing in [0usize, 25, 50, 99] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("existing", existing),
            &existing,
            |b, &existing| {
                b.iter_batched(
                    || {
                        let tracker = create_tracker();
                        for _ in 0..existing {
                            tracker.record_click(&target);
                        }
                        tracker
                    },
                    |tracker| tracker.record_click(&target),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

/// 滚动事件（大多数不会产生写入）
fn bench_track_scroll(c: &mut Criterion) {
    let tracker = create_tracker();
    let mut y = 0.0;

    c.bench_function("track_scroll", |b| {
        b.iter(|| {
            y = (y + 7.0) % 3000.0;
            tracker.track_scroll(ScrollPosition::new(y, 4000.0, 900.0))
        });
    });
}

criterion_group!(
    benches,
    bench_record_click_at_capacity,
    bench_record_click_fill,
    bench_track_scroll
);
criterion_main!(benches);
