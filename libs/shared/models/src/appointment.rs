use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::minutes_since_midnight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

/// Denormalized patient fields carried on an appointment for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRef {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Denormalized doctor fields carried on an appointment for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRef {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One booked (doctor, date, time) slot. The backend is the sole arbiter of
/// conflict-freedom; this type only reflects what it reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default)]
    pub doctor: Option<DoctorRef>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Chronological sort key: the calendar date plus the "HH:MM" slot as
    /// minutes since midnight. Unparseable times sort first within the day.
    pub fn sort_key(&self) -> (NaiveDate, u32) {
        (self.date, minutes_since_midnight(&self.time).unwrap_or(0))
    }

    pub fn patient_name(&self) -> &str {
        self.patient.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn doctor_name(&self) -> &str {
        self.doctor.as_ref().map(|d| d.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_as_lowercase_json() {
        let json = serde_json::to_string(&AppointmentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Cancelled);
    }

    #[test]
    fn appointment_accepts_mongo_style_ids() {
        let raw = r#"{
            "_id": "a1",
            "patient": {"_id": "p1", "name": "Asha Rao", "phone": "555-0101"},
            "doctor": {"_id": "d1", "name": "Dr. Mehta", "specialization": "Cardiology"},
            "date": "2026-08-20",
            "time": "10:30",
            "department": "Cardiology",
            "symptoms": "chest pain",
            "status": "pending"
        }"#;
        let appt: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appt.id, "a1");
        assert_eq!(appt.patient_name(), "Asha Rao");
        assert_eq!(appt.doctor_name(), "Dr. Mehta");
        assert_eq!(appt.sort_key().1, 630);
    }
}
