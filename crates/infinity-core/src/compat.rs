//! Legacy route-style entry points.
//!
//! Earlier releases created models through free helper functions rather
//! than the [`Infinity`] service. These shims keep that call path working
//! unchanged while steering callers to the service API.

use crate::config::ModelConfig;
use crate::content::ModelContent;
use crate::result::InfinityResult;
use crate::service::Infinity;
use std::sync::Arc;

/// Create a model and start loading its first page, route-mixin style.
///
/// Identical in behavior to [`Infinity::model`].
#[deprecated(
    since = "0.1.0",
    note = "create models through `Infinity::model` or `Infinity::create_model`"
)]
pub fn infinity_model(
    service: &Arc<Infinity>,
    resource: &str,
    config: ModelConfig,
) -> InfinityResult<ModelContent> {
    tracing::warn!(
        resource,
        "`infinity_model` is deprecated; create models through the Infinity service"
    );
    Arc::clone(service).model(resource, config)
}
