use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterPatientRequest, Role};

use crate::models::AuthError;

/// Login, registration and session lifecycle. Exactly one place writes the
/// session token (login success) and one place clears it (logout).
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Exchange credentials for a bearer token and open the session.
    pub async fn login(&self, role: Role, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        if request.email.trim().is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if request.password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }

        debug!("Logging in as {}", role);

        let response: LoginResponse = self
            .api
            .request(
                Method::POST,
                login_path(role),
                Some(json!({
                    "email": request.email,
                    "password": request.password,
                })),
            )
            .await?;

        self.api.session().open(role, response.token.clone());
        info!("Session opened for {}", role);

        Ok(response)
    }

    /// Clear the credential. Safe to call when no session is open.
    pub fn logout(&self) {
        self.api.session().close();
        info!("Session closed");
    }

    /// Patient self-registration. Does not open a session; the caller logs
    /// in afterwards with the same credentials.
    pub async fn register_patient(&self, request: RegisterPatientRequest) -> Result<Value, AuthError> {
        if request.name.trim().is_empty() {
            return Err(AuthError::MissingField("Name"));
        }
        if request.email.trim().is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if request.phone.trim().is_empty() {
            return Err(AuthError::MissingField("Phone"));
        }
        if request.password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }

        let response = self
            .api
            .request(
                Method::POST,
                "/patients/register",
                Some(serde_json::to_value(&request).unwrap_or_default()),
            )
            .await?;

        Ok(response)
    }

    pub async fn change_doctor_password(
        &self,
        request: ChangePasswordRequest,
    ) -> Result<Value, AuthError> {
        if request.old_password.is_empty() {
            return Err(AuthError::MissingField("Current password"));
        }
        if request.new_password.is_empty() {
            return Err(AuthError::MissingField("New password"));
        }

        let response = self
            .api
            .request(
                Method::PUT,
                "/doctor/update-password",
                Some(serde_json::to_value(&request).unwrap_or_default()),
            )
            .await?;

        Ok(response)
    }
}

fn login_path(role: Role) -> &'static str {
    match role {
        Role::Patient => "/patients/login",
        Role::Doctor => "/doctor/login",
        Role::Admin => "/admin/login",
    }
}
