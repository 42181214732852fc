use crate::hooks::ModelHooks;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Page size used when neither the model config nor the global defaults
/// specify one.
pub const DEFAULT_PER_PAGE: u64 = 25;

/// Debounce delay used when neither the loader config nor the global
/// defaults specify one.
pub const DEFAULT_EVENT_DEBOUNCE_MS: u64 = 50;

/// Per-list configuration passed when a model is created.
///
/// Every field is optional; unset fields fall back to [`InfinityDefaults`]
/// and then to the built-in defaults.
#[derive(Clone, Default)]
pub struct ModelConfig {
    /// Page to consider the start of the list. Pages are 1-based; setting
    /// this above 1 enables backward ("load previous") pagination.
    pub starting_page: Option<u64>,
    /// Page size.
    pub per_page: Option<u64>,
    /// Query key carrying the page number. Default `page`.
    pub page_param: Option<String>,
    /// Query key carrying the page size. Default `per_page`.
    pub per_page_param: Option<String>,
    /// Dotted path to the total-pages value in response metadata.
    /// Default `meta.total_pages`.
    pub total_pages_param: Option<String>,
    /// Dotted path to the total-count value in response metadata.
    /// Default `meta.count`.
    pub count_param: Option<String>,
    /// Extra filter parameters merged into every page request.
    pub extra_params: Map<String, Value>,
    /// Store override for this list; the service default is used otherwise.
    pub store: Option<Arc<dyn RecordStore>>,
    /// Request-building and post-processing callbacks.
    pub hooks: ModelHooks,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starting_page(mut self, page: u64) -> Self {
        self.starting_page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_page_param(mut self, key: impl Into<String>) -> Self {
        self.page_param = Some(key.into());
        self
    }

    pub fn with_per_page_param(mut self, key: impl Into<String>) -> Self {
        self.per_page_param = Some(key.into());
        self
    }

    pub fn with_total_pages_param(mut self, path: impl Into<String>) -> Self {
        self.total_pages_param = Some(path.into());
        self
    }

    pub fn with_count_param(mut self, path: impl Into<String>) -> Self {
        self.count_param = Some(path.into());
        self
    }

    pub fn with_extra_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_params.insert(key.into(), value);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_hooks(mut self, hooks: ModelHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("starting_page", &self.starting_page)
            .field("per_page", &self.per_page)
            .field("page_param", &self.page_param)
            .field("per_page_param", &self.per_page_param)
            .field("total_pages_param", &self.total_pages_param)
            .field("count_param", &self.count_param)
            .field("extra_params", &self.extra_params)
            .field("store", &self.store.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Application-wide defaults, optionally loaded from a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfinityDefaults {
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub event_debounce_ms: Option<u64>,
}

impl InfinityDefaults {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/infinity/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("infinity/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("infinity\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(defaults) = toml::from_str(&content) {
                        return defaults;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn effective_per_page(&self) -> u64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn effective_event_debounce(&self) -> Duration {
        Duration::from_millis(self.event_debounce_ms.unwrap_or(DEFAULT_EVENT_DEBOUNCE_MS))
    }
}
