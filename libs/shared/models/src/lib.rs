pub mod appointment;
pub mod auth;
pub mod availability;
pub mod contact;
pub mod error;
pub mod people;
pub mod stats;
pub mod time;

pub use appointment::{Appointment, AppointmentStatus, DoctorRef, PatientRef};
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterPatientRequest, Role};
pub use availability::{DayAvailability, ScheduleDay};
pub use contact::{ContactInbox, ContactMessage, ContactRequest};
pub use error::ApiError;
pub use people::{AdminProfile, Doctor, Patient};
pub use stats::{AdminStats, DoctorDashboard, StatusCount};
pub use time::minutes_since_midnight;
