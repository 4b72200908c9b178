use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{ApiError, DayAvailability, ScheduleDay};

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("In {day}, start time must be before end time")]
    InvertedRange { day: ScheduleDay },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AvailabilityError {
    pub fn user_message(&self) -> String {
        match self {
            AvailabilityError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Wire shape of the availability endpoints; the weekly schedule always
/// travels as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEnvelope {
    #[serde(default)]
    pub availability: Vec<DayAvailability>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
}
