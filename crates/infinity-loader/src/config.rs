use infinity_core::InfinityDefaults;
use std::time::Duration;

/// Configuration for one loader element.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Quiet period between a viewport-enter event and the page request.
    /// Re-entering the viewport restarts the delay.
    pub event_debounce: Duration,
    /// Status text while more pages can load.
    pub loading_text: String,
    /// Status text once the list is fully loaded.
    pub loaded_text: String,
    /// Hide the element once no further pages exist.
    pub hide_on_infinity: bool,
    /// Ignore viewport events entirely, e.g. during non-interactive
    /// prerendering.
    pub development_mode: bool,
    /// Load the page before `first_page` instead of the next one.
    pub load_previous: bool,
    /// Selector of the scrollable container, carried for the embedder that
    /// builds the [`ScrollViewport`](crate::viewport::ScrollViewport).
    pub scrollable: Option<String>,
    /// Extra pixels past the container height before fill stops.
    pub trigger_offset: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            event_debounce: Duration::from_millis(50),
            loading_text: "Loading Infinite Model...".to_string(),
            loaded_text: "Infinite Model Entirely Loaded.".to_string(),
            hide_on_infinity: false,
            development_mode: false,
            load_previous: false,
            scrollable: None,
            trigger_offset: 0,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the debounce taken from the global config file.
    pub fn from_defaults(defaults: &InfinityDefaults) -> Self {
        Self {
            event_debounce: defaults.effective_event_debounce(),
            ..Self::default()
        }
    }

    pub fn with_event_debounce(mut self, debounce: Duration) -> Self {
        self.event_debounce = debounce;
        self
    }

    pub fn with_loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    pub fn with_loaded_text(mut self, text: impl Into<String>) -> Self {
        self.loaded_text = text.into();
        self
    }

    pub fn with_hide_on_infinity(mut self, hide: bool) -> Self {
        self.hide_on_infinity = hide;
        self
    }

    pub fn with_development_mode(mut self, on: bool) -> Self {
        self.development_mode = on;
        self
    }

    pub fn with_load_previous(mut self, on: bool) -> Self {
        self.load_previous = on;
        self
    }

    pub fn with_scrollable(mut self, selector: impl Into<String>) -> Self {
        self.scrollable = Some(selector.into());
        self
    }

    pub fn with_trigger_offset(mut self, offset: u32) -> Self {
        self.trigger_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_debounce_is_50ms() {
        let config = LoaderConfig::default();
        assert_eq!(config.event_debounce, Duration::from_millis(50));
        assert!(!config.hide_on_infinity);
        assert!(!config.load_previous);
        assert_eq!(config.trigger_offset, 0);
    }

    #[test]
    fn builder_sets_fields() {
        let config = LoaderConfig::new()
            .with_event_debounce(Duration::from_millis(10))
            .with_hide_on_infinity(true)
            .with_load_previous(true)
            .with_scrollable("#feed")
            .with_trigger_offset(100);

        assert_eq!(config.event_debounce, Duration::from_millis(10));
        assert!(config.hide_on_infinity);
        assert!(config.load_previous);
        assert_eq!(config.scrollable.as_deref(), Some("#feed"));
        assert_eq!(config.trigger_offset, 100);
    }

    #[test]
    fn from_defaults_takes_global_debounce() {
        let defaults = InfinityDefaults {
            per_page: None,
            event_debounce_ms: Some(120),
        };
        let config = LoaderConfig::from_defaults(&defaults);
        assert_eq!(config.event_debounce, Duration::from_millis(120));
    }
}
