use std::sync::Arc;

use scrivener_core::{Extractor, Result};

use crate::Config;

/// Shared handler state.
///
/// The extractor holds no per-request state, so one instance serves every
/// request.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor: Arc::new(extractor) }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Extractor::with_config(config.extractor_config())?))
    }
}
