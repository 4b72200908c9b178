use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::ApiError;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Selected time is not an available slot")]
    SlotNotAvailable,

    #[error("Date must be today or later")]
    PastDate,

    #[error("A booking request is already in flight")]
    SubmitInFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BookingError {
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// The booking form's field state. `department` is copied from the doctor at
/// selection time and submitted as-is, even if the doctor list changes later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub doctor_id: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub symptoms: String,
    pub department: String,
}

/// Slot dropdown state. `Loaded` with an empty list ("no slots available")
/// is a different state from `Loading` ("spinner"), and both are different
/// from `Idle` (doctor or date not chosen yet).
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Idle,
    Loading,
    Loaded(Vec<String>),
}

impl SlotState {
    pub fn slots(&self) -> &[String] {
        match self {
            SlotState::Loaded(slots) => slots,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SlotState::Loading)
    }
}

/// Handle for one slot fetch, captured at dispatch time. The generation is
/// compared against the controller's current one when the response arrives;
/// only the newest request may apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub(crate) generation: u64,
    pub doctor_id: String,
    pub date: NaiveDate,
}

/// What happened when a slot response was handed back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotApply {
    /// Result belonged to the newest request and is now displayed.
    Applied,
    /// Fetch failed; the dropdown shows an empty list and the message should
    /// be surfaced as a non-fatal warning.
    Failed(String),
    /// A newer (doctor, date) selection superseded this request; the result
    /// was discarded.
    Stale,
}

/// Payload for the create-appointment operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub symptoms: String,
    pub department: String,
}

/// Wire shape of the available-slots endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsResponse {
    #[serde(default)]
    pub slots: Vec<String>,
}
