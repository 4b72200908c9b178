use std::cmp::Ordering;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use doctor_cell::UpdateDoctorProfileRequest;
use shared_http::ApiClient;
use shared_models::{Doctor, Patient};

use crate::models::{AdminError, RegisterDoctorRequest, RosterSortField, SortDirection};

fn ordered(a: &str, b: &str, direction: SortDirection) -> Ordering {
    let ordering = a.to_lowercase().cmp(&b.to_lowercase());
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn toggle(
    sort: Option<(RosterSortField, SortDirection)>,
    field: RosterSortField,
) -> (RosterSortField, SortDirection) {
    match sort {
        Some((current, direction)) if current == field => (field, direction.flipped()),
        _ => (field, SortDirection::Asc),
    }
}

/// The admin "manage patients" table: fetched once, then searched and
/// sorted locally; deletion removes the row only after the backend agrees.
pub struct PatientRosterController {
    api: Arc<ApiClient>,
    patients: Vec<Patient>,
    filtered: Vec<Patient>,
    search_term: String,
    sort: Option<(RosterSortField, SortDirection)>,
}

impl PatientRosterController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            patients: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            sort: None,
        }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.filtered
    }

    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        self.patients = self.api.request(Method::GET, "/admin/patients", None).await?;
        self.rebuild_view();
        Ok(())
    }

    /// Case-insensitive substring match on name or phone, reapplied against
    /// the full fetched list whenever the term changes.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.rebuild_view();
    }

    pub fn toggle_sort(&mut self, field: RosterSortField) {
        self.sort = Some(toggle(self.sort, field));
        self.apply_sort();
    }

    pub async fn delete(&mut self, patient_id: &str) -> Result<(), AdminError> {
        if !self.patients.iter().any(|p| p.id == patient_id) {
            return Err(AdminError::UnknownRecord(patient_id.to_string()));
        }

        let _: Value = self
            .api
            .request(
                Method::DELETE,
                &format!("/admin/patients/{}", patient_id),
                None,
            )
            .await?;

        self.patients.retain(|p| p.id != patient_id);
        self.rebuild_view();
        info!("Deleted patient {}", patient_id);
        Ok(())
    }

    fn rebuild_view(&mut self) {
        let term = self.search_term.to_lowercase();
        self.filtered = self
            .patients
            .iter()
            .filter(|p| {
                term.is_empty()
                    || p.name.to_lowercase().contains(&term)
                    || p.phone.as_deref().unwrap_or("").contains(&term)
            })
            .cloned()
            .collect();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some((field, direction)) = self.sort else {
            return;
        };
        self.filtered.sort_by(|a, b| match field {
            RosterSortField::Name => ordered(&a.name, &b.name, direction),
            RosterSortField::Email => ordered(
                a.email.as_deref().unwrap_or(""),
                b.email.as_deref().unwrap_or(""),
                direction,
            ),
        });
    }
}

/// The admin "manage doctors" table, with register/update on top of the
/// same search/sort/delete shape.
pub struct DoctorRosterController {
    api: Arc<ApiClient>,
    doctors: Vec<Doctor>,
    filtered: Vec<Doctor>,
    search_term: String,
    sort: Option<(RosterSortField, SortDirection)>,
}

impl DoctorRosterController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            doctors: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            sort: None,
        }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.filtered
    }

    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        self.doctors = self.api.request(Method::GET, "/admin/doctors", None).await?;
        self.rebuild_view();
        Ok(())
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.rebuild_view();
    }

    pub fn toggle_sort(&mut self, field: RosterSortField) {
        self.sort = Some(toggle(self.sort, field));
        self.apply_sort();
    }

    pub async fn register(&mut self, request: &RegisterDoctorRequest) -> Result<(), AdminError> {
        if request.name.trim().is_empty() {
            return Err(AdminError::MissingField("Name"));
        }
        if request.email.trim().is_empty() {
            return Err(AdminError::MissingField("Email"));
        }
        if request.specialization.trim().is_empty() {
            return Err(AdminError::MissingField("Specialization"));
        }
        if request.password.is_empty() {
            return Err(AdminError::MissingField("Password"));
        }

        let _: Value = self
            .api
            .request(
                Method::POST,
                "/admin/doctor/register",
                Some(serde_json::to_value(request).unwrap_or_default()),
            )
            .await?;

        info!("Registered doctor {}", request.name);
        self.refresh().await
    }

    pub async fn update(
        &mut self,
        doctor_id: &str,
        request: &UpdateDoctorProfileRequest,
    ) -> Result<(), AdminError> {
        let _: Value = self
            .api
            .request(
                Method::PUT,
                &format!("/admin/doctors/{}", doctor_id),
                Some(serde_json::to_value(request).unwrap_or_default()),
            )
            .await?;

        info!("Updated doctor {}", doctor_id);
        self.refresh().await
    }

    pub async fn delete(&mut self, doctor_id: &str) -> Result<(), AdminError> {
        if !self.doctors.iter().any(|d| d.id == doctor_id) {
            return Err(AdminError::UnknownRecord(doctor_id.to_string()));
        }

        let _: Value = self
            .api
            .request(
                Method::DELETE,
                &format!("/admin/doctors/{}", doctor_id),
                None,
            )
            .await?;

        self.doctors.retain(|d| d.id != doctor_id);
        self.rebuild_view();
        info!("Deleted doctor {}", doctor_id);
        Ok(())
    }

    fn rebuild_view(&mut self) {
        let term = self.search_term.to_lowercase();
        self.filtered = self
            .doctors
            .iter()
            .filter(|d| {
                term.is_empty()
                    || d.name.to_lowercase().contains(&term)
                    || d.specialization.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some((field, direction)) = self.sort else {
            return;
        };
        self.filtered.sort_by(|a, b| match field {
            RosterSortField::Name => ordered(&a.name, &b.name, direction),
            RosterSortField::Email => ordered(
                a.email.as_deref().unwrap_or(""),
                b.email.as_deref().unwrap_or(""),
                direction,
            ),
        });
    }
}
