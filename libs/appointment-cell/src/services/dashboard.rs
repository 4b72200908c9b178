use std::sync::Arc;

use futures::future::try_join;
use reqwest::Method;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::{ApiError, Appointment, DoctorDashboard, Patient};

use crate::models::PatientOverview;

/// Read-only dashboard fetches for the patient and doctor home screens.
pub struct DashboardService {
    api: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Profile and next upcoming appointment, fetched concurrently. A 404
    /// on the upcoming lookup means "nothing booked" and degrades to an
    /// empty state rather than an error.
    pub async fn patient_overview(&self) -> Result<PatientOverview, ApiError> {
        let profile = self
            .api
            .request::<Patient>(Method::GET, "/patients/profile", None);
        let upcoming = self.upcoming_appointment();

        let (profile, upcoming) = try_join(profile, upcoming).await?;
        Ok(PatientOverview { profile, upcoming })
    }

    async fn upcoming_appointment(&self) -> Result<Option<Appointment>, ApiError> {
        match self
            .api
            .request::<Appointment>(Method::GET, "/appointments/recent", None)
            .await
        {
            Ok(appointment) => Ok(Some(appointment)),
            Err(err) if err.is_not_found() => {
                debug!("No upcoming appointment");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn doctor_dashboard(&self) -> Result<DoctorDashboard, ApiError> {
        self.api
            .request(Method::GET, "/doctor/dashboard", None)
            .await
    }
}
