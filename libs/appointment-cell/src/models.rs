use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use shared_models::{ApiError, Appointment, AppointmentStatus, Patient};

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    UnknownAppointment(String),

    #[error("Only pending appointments can be cancelled")]
    NotCancellable,

    #[error("This role may not perform that status change")]
    StatusChangeNotAllowed,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppointmentError {
    pub fn user_message(&self) -> String {
        match self {
            AppointmentError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Whose appointments a list shows. The backend scopes the result by the
/// session token; the client only picks the matching route and params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// The logged-in patient's own appointments.
    Patient,
    /// The logged-in doctor's queue.
    Doctor,
    /// Everything; admin only.
    Admin,
}

/// Server-side filters. Only the params the scope's endpoint understands are
/// sent; empty values stay off the wire.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilters {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub patient_name: Option<String>,
}

impl AppointmentFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }
        if let Some(date) = self.date {
            query.push(("date", date.to_string()));
        }
        if let Some(time) = &self.time {
            query.push(("time", time.clone()));
        }
        if let Some(name) = &self.patient_name {
            query.push(("patientName", name.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Calendar date plus the "HH:MM" slot.
    DateTime,
    PatientName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Patient dashboard payload: profile plus the next upcoming appointment
/// ("none" is an empty state, not an error).
#[derive(Debug, Clone)]
pub struct PatientOverview {
    pub profile: Patient,
    pub upcoming: Option<Appointment>,
}

/// Wire shape of every list-appointments endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentsResponse {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// Wire shape of status-change and cancel responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub appointment: Option<Appointment>,
}
