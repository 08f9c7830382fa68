//! Application state shared across handlers

use std::sync::Arc;

use crate::service::UserService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub service_name: String,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserService>, service_name: impl Into<String>) -> Self {
        Self {
            user_service,
            service_name: service_name.into(),
        }
    }
}
