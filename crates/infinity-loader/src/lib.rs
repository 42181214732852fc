pub mod config;
pub mod loader;
pub mod viewport;

pub use config::LoaderConfig;
pub use loader::{InfinityLoader, MAX_FILL_PAGES};
pub use viewport::ScrollViewport;
