use std::sync::Arc;

use activities::{ActivityStore, Dispatcher};

use crate::auth::{HostPolicy, StoreHostPolicy};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub host_policy: Arc<dyn HostPolicy>,
}

impl AppState {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::standard(store.clone())),
            host_policy: Arc::new(StoreHostPolicy::new(store)),
        }
    }
}
