//! Behavioral tests for the loader element: debounce coalescing, timer
//! cancellation, fill-to-visible recursion, and the visibility flag.
//!
//! All tests run with paused tokio time, so timer behavior is exact.

use async_trait::async_trait;
use infinity_core::{
    Infinity, InfinityResult, ModelConfig, ModelId, PageRequest, PageResult, RecordStore,
};
use infinity_loader::{InfinityLoader, LoaderConfig, ScrollViewport, MAX_FILL_PAGES};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Store serving `per_page`-sized pages and counting every query.
struct CountingStore {
    calls: AtomicUsize,
    total_pages: u64,
    per_page: usize,
}

impl CountingStore {
    fn new(total_pages: u64, per_page: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            total_pages,
            per_page,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn query(&self, request: PageRequest) -> InfinityResult<PageResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = request.params.get("page").and_then(Value::as_u64).unwrap();
        let records = (0..self.per_page)
            .map(|i| json!({ "page": page, "row": i }))
            .collect();
        Ok(PageResult::new(records)
            .with_meta(json!({ "meta": { "total_pages": self.total_pages } })))
    }
}

/// Store that parks every query until released.
struct GateStore {
    gate: Arc<Notify>,
    calls: AtomicUsize,
}

#[async_trait]
impl RecordStore for GateStore {
    async fn query(&self, _request: PageRequest) -> InfinityResult<PageResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        let records = (0..25).map(|i| json!({ "row": i })).collect();
        Ok(PageResult::new(records).with_meta(json!({ "meta": { "total_pages": 3 } })))
    }
}

/// Viewport whose loader offset tracks the rendered record count, the way
/// a real list pushes the loader element down as rows render.
struct GrowingViewport {
    service: Arc<Infinity>,
    model: ModelId,
    row_height: u32,
    client_height: u32,
}

impl ScrollViewport for GrowingViewport {
    fn client_height(&self) -> u32 {
        self.client_height
    }

    fn loader_offset_top(&self) -> u32 {
        let rows = self
            .service
            .snapshot(self.model)
            .map(|snap| snap.record_count as u32)
            .unwrap_or(0);
        rows * self.row_height
    }
}

/// Viewport with fixed geometry.
struct FlatViewport {
    client_height: u32,
    offset_top: u32,
}

impl ScrollViewport for FlatViewport {
    fn client_height(&self) -> u32 {
        self.client_height
    }

    fn loader_offset_top(&self) -> u32 {
        self.offset_top
    }
}

/// A viewport already past the fold, so no fill recursion happens.
fn filled_viewport() -> Arc<FlatViewport> {
    Arc::new(FlatViewport {
        client_height: 600,
        offset_top: 10_000,
    })
}

/// Let timers fire and spawned tasks run to completion.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_enter_events_issues_one_fetch() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    for _ in 0..5 {
        loader.entered_viewport();
    }
    settle().await;

    assert_eq!(store.calls(), 1);
    assert_eq!(service.snapshot(id).unwrap().current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn re_entering_restarts_the_debounce() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    tokio::time::sleep(Duration::from_millis(30)).await;
    loader.entered_viewport();
    // 60ms after the first enter: its timer would have fired at 50ms, but
    // was replaced; the second timer fires at 80ms.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(store.calls(), 0);

    settle().await;
    assert_eq!(store.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn exit_before_fire_cancels_the_fetch() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    loader.exited_viewport();
    settle().await;

    assert_eq!(store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_timer() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    loader.teardown();
    settle().await;

    assert_eq!(store.calls(), 0);

    // Events after teardown are ignored too.
    loader.entered_viewport();
    settle().await;
    assert_eq!(store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn drop_cancels_pending_timer() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    drop(loader);
    settle().await;

    assert_eq!(store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn development_mode_ignores_viewport_events() {
    let store = CountingStore::new(10, 25);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new().with_development_mode(true),
    );

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn exit_after_fire_does_not_cancel_the_fetch() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GateStore {
        gate: Arc::clone(&gate),
        calls: AtomicUsize::new(0),
    });
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    // Past the debounce: the fetch is now parked inside the store.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);

    loader.exited_viewport();
    gate.notify_one();
    settle().await;

    assert_eq!(service.snapshot(id).unwrap().record_count, 25);
}

#[tokio::test(start_paused = true)]
async fn fill_recursion_stops_when_content_fills_viewport() {
    // 10 rows of 24px per page against a 600px container: pages 1-2 leave
    // the loader above the fold, page 3 pushes it past (720 > 600).
    let store = CountingStore::new(10, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let viewport = Arc::new(GrowingViewport {
        service: Arc::clone(&service),
        model: id,
        row_height: 24,
        client_height: 600,
    });
    let loader = InfinityLoader::new(Arc::clone(&service), id, viewport, LoaderConfig::new());

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), 3);
    assert_eq!(service.snapshot(id).unwrap().record_count, 30);
    assert!(!service.snapshot(id).unwrap().reached_infinity);
}

#[tokio::test(start_paused = true)]
async fn trigger_offset_extends_the_fill_target() {
    // Same geometry as above, but a 150px trigger offset requires one more
    // page: fill continues until offset_top exceeds 750.
    let store = CountingStore::new(10, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let viewport = Arc::new(GrowingViewport {
        service: Arc::clone(&service),
        model: id,
        row_height: 24,
        client_height: 600,
    });
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        viewport,
        LoaderConfig::new().with_trigger_offset(150),
    );

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn fill_recursion_stops_at_reached_infinity() {
    // Viewport never fills, but only 2 pages exist.
    let store = CountingStore::new(2, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let viewport = Arc::new(FlatViewport {
        client_height: 10_000,
        offset_top: 0,
    });
    let loader = InfinityLoader::new(Arc::clone(&service), id, viewport, LoaderConfig::new());

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), 2);
    assert!(service.snapshot(id).unwrap().reached_infinity);
}

#[tokio::test(start_paused = true)]
async fn fill_recursion_stops_at_the_page_cap() {
    // Pathological geometry: the loader never moves, so the height check
    // alone would recurse forever.
    let store = CountingStore::new(1_000, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let viewport = Arc::new(FlatViewport {
        client_height: 600,
        offset_top: 0,
    });
    let loader = InfinityLoader::new(Arc::clone(&service), id, viewport, LoaderConfig::new());

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), MAX_FILL_PAGES);
}

#[tokio::test(start_paused = true)]
async fn hide_on_infinity_hides_the_loader() {
    let store = CountingStore::new(1, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new().with_hide_on_infinity(true),
    );

    assert!(loader.is_visible());
    assert_eq!(loader.status_text(), "Loading Infinite Model...");

    loader.entered_viewport();
    settle().await;

    assert!(service.snapshot(id).unwrap().reached_infinity);
    assert!(!loader.is_visible());
    assert_eq!(loader.status_text(), "Infinite Model Entirely Loaded.");
}

#[tokio::test(start_paused = true)]
async fn loader_stays_visible_without_hide_on_infinity() {
    let store = CountingStore::new(1, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service.create_model("post", ModelConfig::new()).unwrap();
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        filled_viewport(),
        LoaderConfig::new(),
    );

    loader.entered_viewport();
    settle().await;

    assert!(service.snapshot(id).unwrap().reached_infinity);
    assert!(loader.is_visible());
}

#[tokio::test(start_paused = true)]
async fn load_previous_pages_backward_without_fill() {
    let store = CountingStore::new(5, 10);
    let service = Arc::new(Infinity::new(store.clone() as Arc<dyn RecordStore>));
    let id = service
        .create_model("post", ModelConfig::new().with_starting_page(3))
        .unwrap();
    // Viewport that would demand more pages if fill applied backward.
    let viewport = Arc::new(FlatViewport {
        client_height: 10_000,
        offset_top: 0,
    });
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        viewport,
        LoaderConfig::new().with_load_previous(true),
    );

    loader.entered_viewport();
    settle().await;

    assert_eq!(store.calls(), 1);
    let snap = service.snapshot(id).unwrap();
    assert_eq!(snap.first_page, 2);
    assert_eq!(snap.record_count, 10);

    let records = service.records(id).unwrap();
    assert_eq!(records[0].get("page"), Some(&json!(2)));
}
