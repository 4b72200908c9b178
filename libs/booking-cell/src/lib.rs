pub mod models;
pub mod services;

pub use models::{BookAppointmentRequest, BookingError, BookingForm, SlotApply, SlotRequest, SlotState};
pub use services::booking::BookingController;
pub use services::clock::{Clock, FixedClock, SystemClock};
pub use services::slots::{filter_past_slots, BookingApi};
