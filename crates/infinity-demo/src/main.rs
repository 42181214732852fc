//! Simulated infinite-scroll session: an in-memory post store, a viewport
//! whose loader offset tracks the rendered rows, and a loader element
//! triggered as the "user" keeps scrolling to the bottom.

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Parser;
use infinity_core::{
    Infinity, InfinityResult, ModelConfig, ModelId, PageRequest, PageResult, RecordStore,
};
use infinity_loader::{InfinityLoader, LoaderConfig, ScrollViewport};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Run a simulated infinite-scroll session")]
struct Cli {
    /// Total number of posts in the fake store
    #[arg(long, default_value_t = 120)]
    total: u64,

    /// Page size
    #[arg(long, default_value_t = 25)]
    per_page: u64,

    /// Debounce delay in milliseconds
    #[arg(long, default_value_t = 50)]
    debounce_ms: u64,

    /// Height of the simulated viewport in pixels
    #[arg(long, default_value_t = 600)]
    viewport_height: u32,
}

/// In-memory store with a fixed number of posts.
struct SamplePostStore {
    total: u64,
}

#[async_trait]
impl RecordStore for SamplePostStore {
    async fn query(&self, request: PageRequest) -> InfinityResult<PageResult> {
        let page = request
            .params
            .get("page")
            .and_then(Value::as_u64)
            .unwrap_or(1);
        let per_page = request
            .params
            .get("per_page")
            .and_then(Value::as_u64)
            .unwrap_or(25);

        // Pretend the backend takes a moment.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let start = (page - 1) * per_page;
        let end = (start + per_page).min(self.total);
        let records = (start..end)
            .map(|i| json!({ "id": i + 1, "title": format!("Post {}", i + 1) }))
            .collect();

        Ok(PageResult::new(records).with_meta(json!({
            "meta": {
                "total_pages": self.total.div_ceil(per_page),
                "count": self.total,
            }
        })))
    }
}

/// Viewport where each rendered record occupies one 24px row.
struct RenderedViewport {
    service: Arc<Infinity>,
    model: ModelId,
    client_height: u32,
}

impl ScrollViewport for RenderedViewport {
    fn client_height(&self) -> u32 {
        self.client_height
    }

    fn loader_offset_top(&self) -> u32 {
        let rows = self
            .service
            .snapshot(self.model)
            .map(|snap| snap.record_count as u32)
            .unwrap_or(0);
        rows * 24
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("INFINITY_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();
    let debounce = Duration::from_millis(cli.debounce_ms);

    let store = Arc::new(SamplePostStore { total: cli.total });
    let service = Arc::new(Infinity::new(store));

    let content = Arc::clone(&service).model(
        "post",
        ModelConfig::new().with_per_page(cli.per_page),
    )?;
    let id = content
        .resolve()
        .await
        .map_err(|e| anyhow!("initial page load failed: {e}"))?;

    let viewport = Arc::new(RenderedViewport {
        service: Arc::clone(&service),
        model: id,
        client_height: cli.viewport_height,
    });
    let loader = InfinityLoader::new(
        Arc::clone(&service),
        id,
        viewport,
        LoaderConfig::new().with_event_debounce(debounce),
    );

    println!(
        "scrolling through {} posts, {} per page",
        cli.total, cli.per_page
    );

    // Keep "scrolling to the bottom" until everything is loaded. The
    // bound keeps a misconfigured session from spinning forever.
    let max_scrolls = cli.total / cli.per_page + 2;
    for _ in 0..max_scrolls {
        let snap = service.snapshot(id)?;
        println!(
            "  page {}/{} - {} records",
            snap.current_page,
            snap.total_pages
                .map_or_else(|| "?".to_string(), |tp| tp.to_string()),
            snap.record_count
        );
        if snap.reached_infinity {
            break;
        }

        loader.entered_viewport();
        // Wait out the debounce plus the simulated fetch latency.
        tokio::time::sleep(debounce + Duration::from_millis(100)).await;
    }

    let snap = service.snapshot(id)?;
    println!("{}", loader.status_text());
    println!(
        "done: {} records over {} pages",
        snap.record_count, snap.current_page
    );

    service.remove_model(id);
    Ok(())
}
