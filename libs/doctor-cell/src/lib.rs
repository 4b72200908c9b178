pub mod models;
pub mod services;

pub use models::{AvailabilityError, UpdateDoctorProfileRequest};
pub use services::availability::{merge_week, AvailabilityEditor};
pub use services::directory::DoctorDirectoryService;
