use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::{Appointment, AppointmentStatus};

use crate::models::{
    AppointmentError, AppointmentFilters, AppointmentsResponse, ListScope, SortField, SortOrder,
    StatusUpdateResponse,
};

/// Fetches, filters, sorts and renders one role's appointment list, and
/// submits status transitions. Owns its list exclusively; every mutation
/// goes through the backend first and the local copy is only patched after
/// the backend confirms.
pub struct AppointmentListController {
    api: Arc<ApiClient>,
    scope: ListScope,
    filters: AppointmentFilters,
    appointments: Vec<Appointment>,
    filtered: Vec<Appointment>,
    search_term: String,
    sort: Option<(SortField, SortOrder)>,
}

impl AppointmentListController {
    pub fn new(api: Arc<ApiClient>, scope: ListScope) -> Self {
        Self {
            api,
            scope,
            filters: AppointmentFilters::default(),
            appointments: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            sort: None,
        }
    }

    /// The currently visible (searched, sorted) list.
    pub fn appointments(&self) -> &[Appointment] {
        &self.filtered
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    /// Replace the server-side filters. Takes effect on the next
    /// [`refresh`](Self::refresh).
    pub fn set_filters(&mut self, filters: AppointmentFilters) {
        self.filters = filters;
    }

    /// Fetch the base list for this scope and re-derive the visible view.
    pub async fn refresh(&mut self) -> Result<(), AppointmentError> {
        let path = match self.scope {
            ListScope::Patient => "/appointments/my-appointments",
            ListScope::Doctor => "/doctor/appointments",
            ListScope::Admin => "/admin/appointments",
        };

        debug!("Fetching appointments from {}", path);
        let response: AppointmentsResponse = self
            .api
            .request_with_query(Method::GET, path, &self.filters.to_query(), None)
            .await?;

        self.appointments = response.appointments;
        self.rebuild_view();
        Ok(())
    }

    /// Free-text narrowing of the already-fetched list: case-insensitive
    /// substring match on patient name, patient phone, or doctor name.
    /// Reapplied against the full base list on every change.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.rebuild_view();
    }

    /// Toggle sorting on `field`: first activation sorts ascending,
    /// re-activating the same field flips the direction.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some((current, order)) if current == field => (field, order.flipped()),
            _ => (field, SortOrder::Asc),
        });
        self.apply_sort();
    }

    pub fn sort_state(&self) -> Option<(SortField, SortOrder)> {
        self.sort
    }

    fn rebuild_view(&mut self) {
        let term = self.search_term.to_lowercase();
        self.filtered = self
            .appointments
            .iter()
            .filter(|appt| term.is_empty() || matches_search(appt, &term))
            .cloned()
            .collect();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some((field, order)) = self.sort else {
            return;
        };

        // Stable sort with a reversed comparator, not sort-then-reverse, so
        // equal rows keep their relative order in both directions.
        self.filtered.sort_by(|a, b| {
            let ordering = match field {
                SortField::DateTime => a.sort_key().cmp(&b.sort_key()),
                SortField::PatientName => a
                    .patient_name()
                    .to_lowercase()
                    .cmp(&b.patient_name().to_lowercase()),
            };
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    /// Doctor/admin status transition. The client does not enforce a
    /// forward-only ladder; it submits whatever was chosen and lets the
    /// backend arbitrate. The local record is patched only after the
    /// backend confirms, using the echoed status when the response carries
    /// one.
    pub async fn set_status(
        &mut self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<AppointmentStatus, AppointmentError> {
        let path = match self.scope {
            ListScope::Doctor => format!("/doctor/appointments/{}/status", appointment_id),
            ListScope::Admin => format!("/admin/appointments/{}/status", appointment_id),
            ListScope::Patient => return Err(AppointmentError::StatusChangeNotAllowed),
        };

        let response: StatusUpdateResponse = self
            .api
            .request(
                Method::PATCH,
                &path,
                Some(json!({"status": status.to_string()})),
            )
            .await?;

        let confirmed = response
            .appointment
            .map(|a| a.status)
            .unwrap_or(status);

        self.patch_local_status(appointment_id, confirmed);
        info!("Appointment {} status set to {}", appointment_id, confirmed);
        Ok(confirmed)
    }

    /// Whether the cancel action should be offered for this row at all.
    /// Patients may cancel only their own still-pending appointments.
    pub fn can_cancel(&self, appointment_id: &str) -> bool {
        self.scope == ListScope::Patient
            && self
                .appointments
                .iter()
                .any(|a| a.id == appointment_id && a.status == AppointmentStatus::Pending)
    }

    /// Patient cancellation. The confirmation step ("are you sure?") is the
    /// presentation layer's job; this still refuses anything not pending.
    pub async fn cancel(&mut self, appointment_id: &str) -> Result<(), AppointmentError> {
        if self.scope != ListScope::Patient {
            return Err(AppointmentError::StatusChangeNotAllowed);
        }

        let current = self
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .ok_or_else(|| AppointmentError::UnknownAppointment(appointment_id.to_string()))?;

        if current.status != AppointmentStatus::Pending {
            return Err(AppointmentError::NotCancellable);
        }

        let _: StatusUpdateResponse = self
            .api
            .request(
                Method::PUT,
                &format!("/appointments/cancel/{}", appointment_id),
                None,
            )
            .await?;

        self.patch_local_status(appointment_id, AppointmentStatus::Cancelled);
        info!("Appointment {} cancelled", appointment_id);
        Ok(())
    }

    fn patch_local_status(&mut self, appointment_id: &str, status: AppointmentStatus) {
        for list in [&mut self.appointments, &mut self.filtered] {
            if let Some(appt) = list.iter_mut().find(|a| a.id == appointment_id) {
                appt.status = status;
            }
        }
    }
}

fn matches_search(appt: &Appointment, lower_term: &str) -> bool {
    let patient_name = appt.patient_name().to_lowercase();
    let doctor_name = appt.doctor_name().to_lowercase();
    let phone = appt
        .patient
        .as_ref()
        .and_then(|p| p.phone.as_deref())
        .unwrap_or("");

    patient_name.contains(lower_term)
        || phone.contains(lower_term)
        || doctor_name.contains(lower_term)
}
