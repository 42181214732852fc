//! Model content that may still be loading its first page.

use crate::model::ModelId;
use crate::result::InfinityResult;
use futures::future::BoxFuture;

/// A model handle that is either immediately usable or still waiting on its
/// initial page load. Resolved exactly once at the boundary where the model
/// is handed to a view, instead of inspecting wrapper types at runtime.
pub enum ModelContent {
    /// The model exists and needs no initial fetch.
    Direct(ModelId),
    /// The model is created once the pending initial load finishes.
    Deferred(BoxFuture<'static, InfinityResult<ModelId>>),
}

impl ModelContent {
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// Wait for the initial load (if any) and yield the model id.
    pub async fn resolve(self) -> InfinityResult<ModelId> {
        match self {
            Self::Direct(id) => Ok(id),
            Self::Deferred(pending) => pending.await,
        }
    }
}

impl std::fmt::Debug for ModelContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(id) => f.debug_tuple("Direct").field(id).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
