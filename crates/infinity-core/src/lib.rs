pub mod compat;
pub mod config;
pub mod content;
pub mod error;
pub mod hooks;
pub mod meta;
pub mod model;
pub mod result;
pub mod service;
pub mod store;

pub use config::{InfinityDefaults, ModelConfig, DEFAULT_PER_PAGE};
pub use content::ModelContent;
pub use error::InfinityError;
pub use hooks::ModelHooks;
pub use model::{Direction, InfinityModel, ModelId, ModelSnapshot};
pub use result::InfinityResult;
pub use service::{Infinity, LoadOutcome};
pub use store::{PageRequest, PageResult, Record, RecordStore};
