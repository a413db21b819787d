use std::sync::Arc;

use tether_core::BindingService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: Arc<BindingService>,
    /// Shared secret every protected request must present.
    pub access_token: String,
}

impl AppStateInner {
    pub fn new(service: Arc<BindingService>, access_token: impl Into<String>) -> AppState {
        Arc::new(Self {
            service,
            access_token: access_token.into(),
        })
    }
}
