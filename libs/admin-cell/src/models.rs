use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::ApiError;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown record: {0}")]
    UnknownRecord(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminError {
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Columns the admin tables can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSortField {
    Name,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Payload for the admin's add-doctor form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialization: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub experience: Option<u32>,
}
