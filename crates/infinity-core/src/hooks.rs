//! Optional per-model callbacks.
//!
//! The original design extended the model class to customize request
//! building and post-processing; here the same extension points are a
//! configuration bundle of closures supplied at construction.

use crate::model::InfinityModel;
use crate::store::Record;
use serde_json::{Map, Value};
use std::sync::Arc;

type BuildParamsFn = dyn Fn(Map<String, Value>, &InfinityModel) -> Map<String, Value> + Send + Sync;
type AfterLoadFn = dyn Fn(Vec<Record>, &InfinityModel) -> Vec<Record> + Send + Sync;

/// Callbacks invoked around each page load.
#[derive(Clone, Default)]
pub struct ModelHooks {
    /// Rewrites the outgoing query parameters after the defaults are set.
    pub build_params: Option<Arc<BuildParamsFn>>,
    /// Transforms freshly fetched records before they join the collection.
    pub after_load: Option<Arc<AfterLoadFn>>,
}

impl ModelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_build_params<F>(mut self, f: F) -> Self
    where
        F: Fn(Map<String, Value>, &InfinityModel) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.build_params = Some(Arc::new(f));
        self
    }

    pub fn with_after_load<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<Record>, &InfinityModel) -> Vec<Record> + Send + Sync + 'static,
    {
        self.after_load = Some(Arc::new(f));
        self
    }
}

impl std::fmt::Debug for ModelHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHooks")
            .field("build_params", &self.build_params.is_some())
            .field("after_load", &self.after_load.is_some())
            .finish()
    }
}
