use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::ApiConfig;
use shared_models::ApiError;

use crate::session::SessionStore;

/// Thin typed wrapper over the clinic REST API. Attaches the session bearer
/// token when one is present and maps every failure into the `ApiError`
/// taxonomy. No retries; callers decide what is worth repeating.
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Auth("Session token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Issue a JSON request against `path` (relative to the base URL).
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request_with_query(method, path, &[], body).await
    }

    /// Same as [`request`](Self::request) with URL query parameters. Empty
    /// values are skipped so optional filters stay off the wire.
    pub async fn request_with_query<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers()?)
            .timeout(self.timeout);

        let query: Vec<&(&str, String)> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !query.is_empty() {
            req = req.query(&query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            error!("API error ({}): {}", status, error_text);

            return Err(ApiError::from_status(
                status.as_u16(),
                extract_error_message(&error_text),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network(format!("invalid response body: {}", e)))
    }
}

/// The backend reports failures as `{"error": "..."}`. Pull that message out
/// so it can reach the user verbatim; fall back to the raw body text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backend_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "Slot already booked"}"#),
            "Slot already booked"
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(extract_error_message(r#"{"message": "x"}"#), r#"{"message": "x"}"#);
    }
}
