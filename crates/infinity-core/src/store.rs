use crate::result::InfinityResult;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A single fetched record. Kept as raw JSON so the library works against
/// whatever record shape the backing store produces.
pub type Record = Value;

/// One bounded query for a page of records.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Name of the paginated resource, e.g. `post`.
    pub resource: String,
    /// Query parameters: page number, page size, and any extra filters,
    /// keyed by the configured parameter names.
    pub params: Map<String, Value>,
}

/// The records for one page plus the response metadata the totals are
/// extracted from.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub records: Vec<Record>,
    /// Metadata document; dotted paths such as `meta.total_pages` resolve
    /// against this value. `Value::Null` when the store has none.
    pub meta: Value,
}

impl PageResult {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            meta: Value::Null,
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }
}

/// Trait for the injected page-loading capability.
/// Implementations own transport, authentication, and timeouts; this
/// library only shapes requests and consumes results.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one page of records for the given request.
    async fn query(&self, request: PageRequest) -> InfinityResult<PageResult>;
}
