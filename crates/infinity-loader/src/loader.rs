//! The loader element: a debounced viewport trigger.
//!
//! State machine: `Idle -> PendingDebounce -> Idle` for the timer (a new
//! enter event replaces the pending timer rather than queueing) and
//! `Idle -> Loading -> Idle` around the fetch, which is guarded inside the
//! service so a trigger firing mid-load is ignored.

use crate::config::LoaderConfig;
use crate::viewport::ScrollViewport;
use infinity_core::{Direction, Infinity, LoadOutcome, ModelId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Upper bound on pages fetched by one fill burst. The height checks
/// normally stop the recursion; the cap covers pathological viewports
/// (zero height, off-screen element) that would otherwise never satisfy
/// them.
pub const MAX_FILL_PAGES: usize = 20;

#[derive(Clone, Copy)]
struct FillSettings {
    trigger_offset: u32,
    hide_on_infinity: bool,
}

/// State shared with the spawned timer and fill tasks.
struct LoaderShared {
    alive: AtomicBool,
    visible: AtomicBool,
    reached: AtomicBool,
    debounce: Mutex<Option<JoinHandle<()>>>,
}

impl LoaderShared {
    fn cancel_timer(&self) {
        let mut slot = self
            .debounce
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = slot.take() {
            timer.abort();
        }
    }
}

/// A visual element that requests the next (or previous) page when it
/// scrolls into view. Must be used inside a tokio runtime; the debounce is
/// a spawned, abortable task.
pub struct InfinityLoader {
    service: Arc<Infinity>,
    model: ModelId,
    viewport: Arc<dyn ScrollViewport>,
    config: LoaderConfig,
    shared: Arc<LoaderShared>,
}

impl InfinityLoader {
    pub fn new(
        service: Arc<Infinity>,
        model: ModelId,
        viewport: Arc<dyn ScrollViewport>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            service,
            model,
            viewport,
            config,
            shared: Arc::new(LoaderShared {
                alive: AtomicBool::new(true),
                visible: AtomicBool::new(true),
                reached: AtomicBool::new(false),
                debounce: Mutex::new(None),
            }),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The element scrolled into view. Restarts the debounce timer,
    /// coalescing bursts of enter events into a single page request.
    pub fn entered_viewport(&self) {
        if self.config.development_mode || !self.shared.alive.load(Ordering::SeqCst) {
            return;
        }

        let direction = if self.config.load_previous {
            Direction::Backward
        } else {
            Direction::Forward
        };

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let viewport = Arc::clone(&self.viewport);
        let model = self.model;
        let settings = FillSettings {
            trigger_offset: self.config.trigger_offset,
            hide_on_infinity: self.config.hide_on_infinity,
        };
        let debounce = self.config.event_debounce;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !shared.alive.load(Ordering::SeqCst) {
                return;
            }
            // The fetch runs in its own task so a late viewport-exit can
            // only cancel the timer, never an in-flight request.
            tokio::spawn(fill_pages(service, shared, viewport, model, direction, settings));
        });

        let mut slot = self
            .shared
            .debounce
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(timer) {
            previous.abort();
        }
    }

    /// The element scrolled out of view. Cancels the pending timer only.
    pub fn exited_viewport(&self) {
        self.shared.cancel_timer();
    }

    /// The element is going away. Cancels the pending timer and stops any
    /// later results from being applied on this loader's behalf.
    pub fn teardown(&self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        self.shared.cancel_timer();
    }

    /// Visual flag: false once the list is fully loaded and
    /// `hide_on_infinity` is set.
    pub fn is_visible(&self) -> bool {
        self.shared.visible.load(Ordering::SeqCst)
    }

    /// `loaded_text` once no further pages exist, otherwise `loading_text`.
    pub fn status_text(&self) -> &str {
        if self.shared.reached.load(Ordering::SeqCst) {
            &self.config.loaded_text
        } else {
            &self.config.loading_text
        }
    }

    /// Re-read the model and apply the visibility rule. Called after every
    /// load; exposed for embedders that toggle `hide_on_infinity` state
    /// out of band.
    pub fn refresh_visibility(&self) {
        sync_flags(
            &self.service,
            &self.shared,
            self.model,
            self.config.hide_on_infinity,
        );
    }
}

impl Drop for InfinityLoader {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One debounced trigger firing: load a page, then keep loading while the
/// rendered content has not filled the visible height (forward only),
/// stopping on reached-infinity, a sentinel outcome, an error, or the page
/// cap.
async fn fill_pages(
    service: Arc<Infinity>,
    shared: Arc<LoaderShared>,
    viewport: Arc<dyn ScrollViewport>,
    model: ModelId,
    direction: Direction,
    settings: FillSettings,
) {
    for fills in 1..=MAX_FILL_PAGES {
        if !shared.alive.load(Ordering::SeqCst) {
            return;
        }

        let outcome = match service.load(model, direction).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(model = %model, error = %error, "page load failed");
                return;
            }
        };
        sync_flags(&service, &shared, model, settings.hide_on_infinity);

        if !matches!(outcome, LoadOutcome::Loaded { .. }) {
            return;
        }
        if direction == Direction::Backward {
            // Fill-to-visible only applies when extending the list
            // downward.
            return;
        }
        if shared.reached.load(Ordering::SeqCst) {
            return;
        }
        if !needs_fill(viewport.as_ref(), settings.trigger_offset) {
            return;
        }
        if fills == MAX_FILL_PAGES {
            tracing::warn!(
                model = %model,
                pages = MAX_FILL_PAGES,
                "fill recursion stopped at page cap; viewport never filled"
            );
        }
    }
}

/// The loader element has not yet been pushed past the bottom of the
/// visible area, so another page is needed.
fn needs_fill(viewport: &dyn ScrollViewport, trigger_offset: u32) -> bool {
    viewport.client_height().saturating_add(trigger_offset) > viewport.loader_offset_top()
}

fn sync_flags(service: &Infinity, shared: &LoaderShared, model: ModelId, hide_on_infinity: bool) {
    if let Ok(snapshot) = service.snapshot(model) {
        shared
            .reached
            .store(snapshot.reached_infinity, Ordering::SeqCst);
        if hide_on_infinity && snapshot.reached_infinity {
            shared.visible.store(false, Ordering::SeqCst);
        }
    }
}
