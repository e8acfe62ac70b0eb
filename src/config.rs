//! Facade configuration.
//!
//! Defaults live in an explicit value handed to the facade at construction
//! time rather than a global lookup, so tests can vary them without touching
//! shared state.

/// Facade-level defaults consulted during request normalization.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whether PUT requests are rewritten to uploadable POST requests when a
    /// per-call override is absent. Defaults to `true`.
    pub uploadable_put: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            uploadable_put: true,
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uploadable-PUT default.
    pub fn with_uploadable_put(mut self, enabled: bool) -> Self {
        self.uploadable_put = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploadable_put_defaults_to_true() {
        assert!(HttpConfig::default().uploadable_put);
    }

    #[test]
    fn builder_overrides_default() {
        let config = HttpConfig::new().with_uploadable_put(false);
        assert!(!config.uploadable_put);
    }
}
