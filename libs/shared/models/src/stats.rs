use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[serde(alias = "_id")]
    pub status: AppointmentStatus,
    pub count: u64,
}

/// Clinic-wide totals shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_patients: u64,
    pub total_doctors: u64,
    pub total_appointments: u64,
    pub today_appointments: u64,
    #[serde(default)]
    pub status_counts: Vec<StatusCount>,
}

/// Per-doctor queue summary plus the most recent bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    #[serde(default)]
    pub total_appointments: u64,
    #[serde(default)]
    pub today_appointments: u64,
    #[serde(default)]
    pub pending_appointments: u64,
    #[serde(default)]
    pub completed_appointments: u64,
    #[serde(default)]
    pub cancelled_appointments: u64,
    #[serde(default)]
    pub recent_appointments: Vec<Appointment>,
}
