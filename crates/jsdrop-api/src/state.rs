use std::sync::Arc;

use jsdrop_core::{Config, TypeValidator};
use jsdrop_storage::Storage;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub validator: TypeValidator,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Arc<Self> {
        let validator = TypeValidator::from_config(&config.upload);
        Arc::new(Self {
            config,
            validator,
            storage,
        })
    }
}
