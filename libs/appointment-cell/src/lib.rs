pub mod models;
pub mod services;

pub use models::{
    AppointmentError, AppointmentFilters, ListScope, PatientOverview, SortField, SortOrder,
};
pub use services::dashboard::DashboardService;
pub use services::list::AppointmentListController;
