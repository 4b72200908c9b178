use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use shared_http::ApiClient;
use shared_models::{ApiError, Doctor, Patient};

use crate::models::UpdateDoctorProfileRequest;

/// Doctor directory reads plus the logged-in doctor's own profile.
pub struct DoctorDirectoryService {
    api: Arc<ApiClient>,
}

impl DoctorDirectoryService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Directory as patients see it when booking.
    pub async fn list_for_patient(&self) -> Result<Vec<Doctor>, ApiError> {
        self.api.request(Method::GET, "/patients/doctors", None).await
    }

    /// Public browse page; no credential required.
    pub async fn list_public(&self) -> Result<Vec<Doctor>, ApiError> {
        self.api.request(Method::GET, "/doctors", None).await
    }

    pub async fn profile(&self) -> Result<Doctor, ApiError> {
        self.api.request(Method::GET, "/doctor/profile", None).await
    }

    pub async fn update_profile(
        &self,
        request: &UpdateDoctorProfileRequest,
    ) -> Result<Value, ApiError> {
        self.api
            .request(
                Method::PUT,
                "/doctor/profile",
                Some(serde_json::to_value(request).unwrap_or_default()),
            )
            .await
    }

    /// Patients who have booked with this doctor.
    pub async fn my_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.api.request(Method::GET, "/doctor/patients", None).await
    }
}
