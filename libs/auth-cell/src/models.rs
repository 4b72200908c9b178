use thiserror::Error;

use shared_models::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Text suitable for direct display next to the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingField(field) => format!("{} is required", field),
            AuthError::Api(err) => err.user_message(),
        }
    }
}
