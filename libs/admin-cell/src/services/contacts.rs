use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use shared_http::ApiClient;
use shared_models::{ApiError, ContactInbox, ContactMessage, ContactRequest};

/// Moderation of the two inbound contact inboxes (public site form and
/// logged-in patient help form). Messages can only be read and deleted.
pub struct ContactModerationService {
    api: Arc<ApiClient>,
}

impl ContactModerationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, inbox: ContactInbox) -> Result<Vec<ContactMessage>, ApiError> {
        self.api
            .request(
                Method::GET,
                &format!("/admin/contacts/{}", inbox.as_str()),
                None,
            )
            .await
    }

    /// Deletion is permanent; the confirmation step belongs to the
    /// presentation layer.
    pub async fn delete(&self, inbox: ContactInbox, message_id: &str) -> Result<(), ApiError> {
        let _: Value = self
            .api
            .request(
                Method::DELETE,
                &format!("/admin/contacts/{}/{}", inbox.as_str(), message_id),
                None,
            )
            .await?;

        info!("Deleted {} contact message {}", inbox.as_str(), message_id);
        Ok(())
    }
}

/// The unauthenticated contact form on the public site. Required fields are
/// checked locally before anything goes on the wire.
pub struct PublicContactForm {
    api: Arc<ApiClient>,
}

impl PublicContactForm {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn submit(&self, request: &ContactRequest) -> Result<Value, ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if request.message.trim().is_empty() {
            return Err(ApiError::Validation("Message is required".to_string()));
        }

        self.api
            .request(
                Method::POST,
                "/public/contact",
                Some(serde_json::to_value(request).unwrap_or_default()),
            )
            .await
    }
}
