//! Per-list pagination state.
//!
//! An [`InfinityModel`] tracks which pages have been requested, the records
//! accumulated so far, and whether more pages exist in the direction being
//! paginated. Models are owned by the [`Infinity`](crate::service::Infinity)
//! service registry and mutated only through it.

use crate::config::{InfinityDefaults, ModelConfig};
use crate::hooks::ModelHooks;
use crate::meta::extract_number;
use crate::store::{PageRequest, PageResult, Record, RecordStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a model within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(Uuid);

impl ModelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Direction of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Load the page after `current_page`, appending records.
    Forward,
    /// Load the page before `first_page`, prepending records.
    Backward,
}

/// Pagination state for one list.
pub struct InfinityModel {
    id: ModelId,
    resource: String,
    current_page: u64,
    first_page: u64,
    per_page: u64,
    total_pages: Option<u64>,
    total_count: Option<u64>,
    records: Vec<Record>,
    reached_infinity: bool,
    loading: bool,
    last_loaded_at: Option<DateTime<Utc>>,
    page_param: String,
    per_page_param: String,
    total_pages_param: String,
    count_param: String,
    extra_params: Map<String, Value>,
    store: Option<Arc<dyn RecordStore>>,
    hooks: ModelHooks,
}

impl InfinityModel {
    pub(crate) fn new(resource: String, config: ModelConfig, defaults: &InfinityDefaults) -> Self {
        // A starting page above 1 marks where backward pagination begins;
        // the next forward load still requests `current_page + 1`.
        let current_page = config.starting_page.map_or(0, |s| s - 1);
        let first_page = if current_page == 0 { 1 } else { current_page + 1 };

        Self {
            id: ModelId::new(),
            resource,
            current_page,
            first_page,
            per_page: config.per_page.unwrap_or_else(|| defaults.effective_per_page()),
            total_pages: None,
            total_count: None,
            records: Vec::new(),
            reached_infinity: false,
            loading: false,
            last_loaded_at: None,
            page_param: config.page_param.unwrap_or_else(|| "page".to_string()),
            per_page_param: config
                .per_page_param
                .unwrap_or_else(|| "per_page".to_string()),
            total_pages_param: config
                .total_pages_param
                .unwrap_or_else(|| "meta.total_pages".to_string()),
            count_param: config.count_param.unwrap_or_else(|| "meta.count".to_string()),
            extra_params: config.extra_params,
            store: config.store,
            hooks: config.hooks,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn first_page(&self) -> u64 {
        self.first_page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn reached_infinity(&self) -> bool {
        self.reached_infinity
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    pub fn extra_params(&self) -> &Map<String, Value> {
        &self.extra_params
    }

    /// Page number the next load in `direction` will request.
    pub fn next_page(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Forward => self.current_page + 1,
            Direction::Backward => self.first_page.saturating_sub(1),
        }
    }

    /// Whether a load in `direction` would fetch anything. False while a
    /// fetch is in flight, once forward pagination reached the end, or once
    /// backward pagination reached page 1.
    pub fn can_load_more(&self, direction: Direction) -> bool {
        if self.loading {
            return false;
        }
        match direction {
            Direction::Forward => !self.reached_infinity,
            // Backward loads only make sense once something was loaded and
            // the list did not start on page 1.
            Direction::Backward => self.first_page > 1 && self.current_page > 0,
        }
    }

    /// Total pages, either reported directly or derived from a record count.
    pub fn effective_total_pages(&self) -> Option<u64> {
        self.total_pages
            .or_else(|| self.total_count.map(|count| count.div_ceil(self.per_page)))
    }

    pub(crate) fn store(&self) -> Option<Arc<dyn RecordStore>> {
        self.store.clone()
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Build the outgoing request for the next page in `direction`.
    pub(crate) fn page_request(&self, direction: Direction) -> PageRequest {
        let mut params = Map::new();
        params.insert(self.page_param.clone(), self.next_page(direction).into());
        params.insert(self.per_page_param.clone(), self.per_page.into());
        for (key, value) in &self.extra_params {
            params.insert(key.clone(), value.clone());
        }

        if let Some(build_params) = self.hooks.build_params.clone() {
            params = build_params(params, self);
        }

        PageRequest {
            resource: self.resource.clone(),
            params,
        }
    }

    /// Fold a successful page fetch into the model. Returns the number of
    /// records that joined the collection.
    pub(crate) fn apply_page(&mut self, direction: Direction, page: PageResult) -> usize {
        if let Some(total_pages) = extract_number(&page.meta, &self.total_pages_param) {
            self.total_pages = Some(total_pages);
        }
        if let Some(count) = extract_number(&page.meta, &self.count_param) {
            self.total_count = Some(count);
        }

        let mut new_records = page.records;
        if let Some(after_load) = self.hooks.after_load.clone() {
            new_records = after_load(new_records, self);
        }
        let fetched = new_records.len();

        match direction {
            Direction::Forward => {
                self.records.append(&mut new_records);
                self.current_page += 1;
            }
            Direction::Backward => {
                self.records.splice(0..0, new_records);
                self.first_page -= 1;
            }
        }

        self.recompute_reached(direction, fetched);
        self.loading = false;
        self.last_loaded_at = Some(Utc::now());
        fetched
    }

    fn recompute_reached(&mut self, direction: Direction, fetched: usize) {
        self.reached_infinity = match direction {
            Direction::Forward => match self.effective_total_pages() {
                Some(total_pages) => self.current_page >= total_pages,
                // No metadata at all: a short page ends pagination.
                None => (fetched as u64) < self.per_page,
            },
            Direction::Backward => self.first_page <= 1,
        };
    }

    pub(crate) fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub(crate) fn clear_records(&mut self) {
        self.records.clear();
    }

    /// Copy of the observable state, for callers that must not hold the
    /// registry lock.
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            id: self.id,
            resource: self.resource.clone(),
            current_page: self.current_page,
            first_page: self.first_page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            total_count: self.total_count,
            record_count: self.records.len(),
            reached_infinity: self.reached_infinity,
            loading: self.loading,
            last_loaded_at: self.last_loaded_at,
        }
    }
}

impl fmt::Debug for InfinityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfinityModel")
            .field("id", &self.id)
            .field("resource", &self.resource)
            .field("current_page", &self.current_page)
            .field("first_page", &self.first_page)
            .field("per_page", &self.per_page)
            .field("total_pages", &self.total_pages)
            .field("total_count", &self.total_count)
            .field("record_count", &self.records.len())
            .field("reached_infinity", &self.reached_infinity)
            .field("loading", &self.loading)
            .finish()
    }
}

/// Observable state of a model at one point in time.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub id: ModelId,
    pub resource: String,
    pub current_page: u64,
    pub first_page: u64,
    pub per_page: u64,
    pub total_pages: Option<u64>,
    pub total_count: Option<u64>,
    pub record_count: usize,
    pub reached_infinity: bool,
    pub loading: bool,
    pub last_loaded_at: Option<DateTime<Utc>>,
}
