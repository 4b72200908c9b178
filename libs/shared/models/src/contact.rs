use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which moderation inbox a contact message landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactInbox {
    Public,
    Patient,
}

impl ContactInbox {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactInbox::Public => "public",
            ContactInbox::Patient => "patient",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for the unauthenticated public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}
