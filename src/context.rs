//! Run context holding the shared, immutable state of one invocation.

use std::sync::Arc;

use crate::config::Config;
use crate::source::{PlainTextSource, TextCache, TextSource};

/// Root context for a run.
///
/// Built once after configuration is resolved and handed to services by
/// reference. Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct Context {
    /// Resolved configuration, frozen for the run.
    pub config: Arc<Config>,
    /// Extracted-text cache, keyed by content hash.
    pub cache: Arc<TextCache>,
    /// Text extraction backend.
    pub source: Arc<dyn TextSource>,
}

impl Context {
    /// Creates a context using the plain-text source and the cache
    /// directory from `config.paths.cache`.
    pub fn new(config: Config) -> Self {
        let cache = TextCache::new(config.paths.cache.clone());
        Self::with_source(config, cache, PlainTextSource::default())
    }

    pub fn with_source(
        config: Config,
        cache: TextCache,
        source: impl TextSource + 'static,
    ) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(cache),
            source: Arc::new(source),
        }
    }
}
