use crate::database::FormStore;
use crate::models::DEFAULT_PAGE_LIMIT;

#[derive(Clone)]
pub struct AppState {
    pub store: FormStore,
    pub default_limit: u32,
}

impl AppState {
    pub fn new(store: FormStore) -> Self {
        AppState {
            store,
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }
}
