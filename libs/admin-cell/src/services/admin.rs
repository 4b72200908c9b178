use std::sync::Arc;

use reqwest::Method;

use shared_http::ApiClient;
use shared_models::{AdminProfile, AdminStats, ApiError};

/// Admin profile and the clinic-wide dashboard counters.
pub struct AdminService {
    api: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> Result<AdminProfile, ApiError> {
        self.api.request(Method::GET, "/admin/profile", None).await
    }

    pub async fn stats(&self) -> Result<AdminStats, ApiError> {
        self.api.request(Method::GET, "/admin/stats", None).await
    }
}
