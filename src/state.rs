//! Shared application state for all routes. Immutable after startup.

use crate::config::ListDefaults;
use crate::store::StudentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub list_defaults: ListDefaults,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, list_defaults: ListDefaults) -> Self {
        AppState {
            store,
            list_defaults,
        }
    }
}
