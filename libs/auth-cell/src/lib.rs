pub mod models;
pub mod services;

pub use models::AuthError;
pub use services::auth::AuthService;
