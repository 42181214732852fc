//! The `Infinity` service: an owned registry of pagination models and the
//! single entry point through which pages are requested.

use crate::config::{InfinityDefaults, ModelConfig};
use crate::content::ModelContent;
use crate::error::InfinityError;
use crate::model::{Direction, InfinityModel, ModelId, ModelSnapshot};
use crate::result::InfinityResult;
use crate::store::{Record, RecordStore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a call to [`Infinity::load`] did.
///
/// The non-`Loaded` variants are sentinels, not errors: a trigger firing
/// while a fetch is in flight or after the end of the data is an expected,
/// silently-ignored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and folded into the model.
    Loaded {
        direction: Direction,
        new_records: usize,
    },
    /// A fetch for this model is already in flight; no request was issued.
    AlreadyLoading,
    /// No further pages exist in the requested direction; no request was
    /// issued.
    AtEnd,
    /// The model was removed while the fetch was in flight; the result was
    /// discarded.
    TornDown,
}

/// Holds every concurrently-paginated list, in insertion order, addressable
/// by [`ModelId`]. Lists are added when a view initialises and removed when
/// it tears down.
pub struct Infinity {
    store: Arc<dyn RecordStore>,
    defaults: InfinityDefaults,
    models: Mutex<Vec<InfinityModel>>,
}

impl Infinity {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_defaults(store, InfinityDefaults::default())
    }

    pub fn with_defaults(store: Arc<dyn RecordStore>, defaults: InfinityDefaults) -> Self {
        Self {
            store,
            defaults,
            models: Mutex::new(Vec::new()),
        }
    }

    pub fn defaults(&self) -> &InfinityDefaults {
        &self.defaults
    }

    fn registry(&self) -> MutexGuard<'_, Vec<InfinityModel>> {
        self.models.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new model for `resource`. Configuration problems are
    /// programmer errors and fail here, synchronously, before anything is
    /// fetched.
    pub fn create_model(&self, resource: &str, config: ModelConfig) -> InfinityResult<ModelId> {
        if resource.trim().is_empty() {
            return Err(InfinityError::MissingResourceName);
        }
        if config.per_page == Some(0) {
            return Err(InfinityError::Config(
                "per_page must be at least 1".to_string(),
            ));
        }
        if config.starting_page == Some(0) {
            return Err(InfinityError::Config(
                "starting_page is 1-based; page 0 does not exist".to_string(),
            ));
        }

        let model = InfinityModel::new(resource.to_string(), config, &self.defaults);
        let id = model.id();
        self.registry().push(model);
        tracing::debug!(model = %id, resource, "registered infinity model");
        Ok(id)
    }

    /// Create a model and kick off its first forward page load, returning
    /// the pending content. This is the usual way a list view obtains its
    /// model.
    pub fn model(
        self: Arc<Self>,
        resource: &str,
        config: ModelConfig,
    ) -> InfinityResult<ModelContent> {
        let id = self.create_model(resource, config)?;
        let service = Arc::clone(&self);
        Ok(ModelContent::Deferred(Box::pin(async move {
            service.load(id, Direction::Forward).await?;
            Ok(id)
        })))
    }

    /// Request the next page in `direction` for `id`.
    ///
    /// At most one fetch is in flight per model: the guard is checked and
    /// the loading flag set under the registry lock, which is released
    /// before the store is awaited. On store failure the model is left
    /// unchanged apart from clearing the loading flag.
    pub async fn load(&self, id: ModelId, direction: Direction) -> InfinityResult<LoadOutcome> {
        let (request, store) = {
            let mut models = self.registry();
            let model = models
                .iter_mut()
                .find(|m| m.id() == id)
                .ok_or(InfinityError::UnknownModel(id))?;

            if model.is_loading() {
                tracing::debug!(model = %id, "load skipped: fetch already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if !model.can_load_more(direction) {
                tracing::debug!(model = %id, ?direction, "load skipped: no more pages");
                return Ok(LoadOutcome::AtEnd);
            }

            model.set_loading(true);
            let store = model.store().unwrap_or_else(|| Arc::clone(&self.store));
            (model.page_request(direction), store)
        };

        tracing::debug!(
            model = %id,
            resource = %request.resource,
            ?direction,
            "requesting page"
        );
        let fetched = store.query(request).await;

        let mut models = self.registry();
        let Some(model) = models.iter_mut().find(|m| m.id() == id) else {
            // The list was torn down while the fetch was in flight.
            tracing::debug!(model = %id, "discarding page for removed model");
            return Ok(LoadOutcome::TornDown);
        };

        match fetched {
            Ok(page) => {
                let new_records = model.apply_page(direction, page);
                tracing::debug!(
                    model = %id,
                    new_records,
                    current_page = model.current_page(),
                    first_page = model.first_page(),
                    reached_infinity = model.reached_infinity(),
                    "page applied"
                );
                Ok(LoadOutcome::Loaded {
                    direction,
                    new_records,
                })
            }
            Err(error) => {
                model.set_loading(false);
                Err(error)
            }
        }
    }

    /// Observable state of one model.
    pub fn snapshot(&self, id: ModelId) -> InfinityResult<ModelSnapshot> {
        let models = self.registry();
        models
            .iter()
            .find(|m| m.id() == id)
            .map(InfinityModel::snapshot)
            .ok_or(InfinityError::UnknownModel(id))
    }

    /// Clone of the records accumulated for one model.
    pub fn records(&self, id: ModelId) -> InfinityResult<Vec<Record>> {
        let models = self.registry();
        models
            .iter()
            .find(|m| m.id() == id)
            .map(|m| m.records().to_vec())
            .ok_or(InfinityError::UnknownModel(id))
    }

    /// Swap the accumulated collection for `records`. Page counters are
    /// untouched; this is a collection-level operation.
    pub fn replace(&self, id: ModelId, records: Vec<Record>) -> InfinityResult<()> {
        let mut models = self.registry();
        let model = models
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(InfinityError::UnknownModel(id))?;
        model.replace_records(records);
        Ok(())
    }

    /// Clear the accumulated collection.
    pub fn flush(&self, id: ModelId) -> InfinityResult<()> {
        let mut models = self.registry();
        let model = models
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(InfinityError::UnknownModel(id))?;
        model.clear_records();
        Ok(())
    }

    /// Drop a model from the registry. Returns whether it was present;
    /// removing an already-removed model is not an error.
    pub fn remove_model(&self, id: ModelId) -> bool {
        let mut models = self.registry();
        let before = models.len();
        models.retain(|m| m.id() != id);
        before != models.len()
    }

    /// Ids of all registered models, in insertion order.
    pub fn model_ids(&self) -> Vec<ModelId> {
        self.registry().iter().map(InfinityModel::id).collect()
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }
}
