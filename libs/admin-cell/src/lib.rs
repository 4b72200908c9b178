pub mod models;
pub mod services;

pub use models::{AdminError, RegisterDoctorRequest, RosterSortField, SortDirection};
pub use services::admin::AdminService;
pub use services::contacts::{ContactModerationService, PublicContactForm};
pub use services::roster::{DoctorRosterController, PatientRosterController};
