use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use shared_models::{ApiError, Doctor};

use crate::models::{
    BookAppointmentRequest, BookingError, BookingForm, SlotApply, SlotRequest, SlotState,
};

use super::clock::Clock;
use super::slots::{filter_past_slots, BookingApi};

/// Drives the booking form: doctor selection, date selection, slot fetch,
/// slot selection, submission. Owns its field state exclusively; the
/// presentation layer reads it and calls back in.
///
/// Slot responses apply in last-request-wins order: every doctor/date change
/// bumps a generation counter, each fetch carries the generation it was
/// dispatched under, and [`apply_slots`](Self::apply_slots) discards any
/// result whose generation is no longer current.
pub struct BookingController {
    api: Arc<dyn BookingApi>,
    clock: Arc<dyn Clock>,
    doctors: Vec<Doctor>,
    form: BookingForm,
    slot_state: SlotState,
    generation: u64,
    submitting: bool,
}

impl BookingController {
    pub fn new(api: Arc<dyn BookingApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            doctors: Vec::new(),
            form: BookingForm::default(),
            slot_state: SlotState::Idle,
            generation: 0,
            submitting: false,
        }
    }

    pub async fn load_doctors(&mut self) -> Result<(), BookingError> {
        self.doctors = self.api.list_doctors().await?;
        Ok(())
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn slot_state(&self) -> &SlotState {
        &self.slot_state
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Select a doctor. Copies the doctor's specialization into the
    /// department field (denormalization happens here, not at submission)
    /// and invalidates the previously chosen time. Returns the slot request
    /// to dispatch, when a date is already chosen.
    pub fn select_doctor(&mut self, doctor_id: &str) -> Result<Option<SlotRequest>, BookingError> {
        let doctor = self
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .ok_or_else(|| BookingError::UnknownDoctor(doctor_id.to_string()))?;

        self.form.doctor_id = doctor.id.clone();
        self.form.department = doctor.specialization.clone();
        self.form.time.clear();

        Ok(self.restart_slot_fetch())
    }

    /// Select the appointment date. Invalidates the previously chosen time.
    /// Returns the slot request to dispatch, when a doctor is already chosen.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<SlotRequest> {
        self.form.date = Some(date);
        self.form.time.clear();
        self.restart_slot_fetch()
    }

    fn restart_slot_fetch(&mut self) -> Option<SlotRequest> {
        // Any previously issued request is stale from this point on.
        self.generation += 1;

        let date = match self.form.date {
            Some(date) if !self.form.doctor_id.is_empty() => date,
            _ => {
                self.slot_state = SlotState::Idle;
                return None;
            }
        };

        self.slot_state = SlotState::Loading;
        Some(SlotRequest {
            generation: self.generation,
            doctor_id: self.form.doctor_id.clone(),
            date,
        })
    }

    /// Hand a fetch result back to the controller. Stale results (a newer
    /// doctor/date selection happened while the fetch was in flight) are
    /// discarded without touching the dropdown. Fetch failures are
    /// non-fatal: the dropdown shows an empty list and the form stays
    /// usable, so changing doctor or date retries naturally.
    pub fn apply_slots(
        &mut self,
        request: &SlotRequest,
        result: Result<Vec<String>, ApiError>,
    ) -> SlotApply {
        if request.generation != self.generation {
            debug!(
                "Discarding stale slot response for doctor {} on {}",
                request.doctor_id, request.date
            );
            return SlotApply::Stale;
        }

        match result {
            Ok(slots) => {
                let slots = filter_past_slots(slots, request.date, self.clock.as_ref());
                self.slot_state = SlotState::Loaded(slots);
                SlotApply::Applied
            }
            Err(err) => {
                warn!("Failed to fetch available slots: {}", err);
                self.slot_state = SlotState::Loaded(Vec::new());
                SlotApply::Failed("Failed to fetch available time slots.".to_string())
            }
        }
    }

    /// Fetch-then-apply in one step, for drivers without their own task
    /// spawning. The request must come from a prior `select_doctor` /
    /// `select_date` call so the staleness check still holds.
    pub async fn refresh_slots(&mut self, request: SlotRequest) -> SlotApply {
        let result = self.api.fetch_slots(&request.doctor_id, request.date).await;
        self.apply_slots(&request, result)
    }

    /// Pick a time. Only values from the currently loaded slot list are
    /// accepted.
    pub fn select_time(&mut self, time: &str) -> Result<(), BookingError> {
        if !self.slot_state.slots().iter().any(|s| s == time) {
            return Err(BookingError::SlotNotAvailable);
        }
        self.form.time = time.to_string();
        Ok(())
    }

    pub fn set_symptoms(&mut self, symptoms: &str) {
        self.form.symptoms = symptoms.to_string();
    }

    /// Field-level validation, run before submission. Failures block the
    /// request entirely.
    pub fn validate(&self) -> Result<BookAppointmentRequest, BookingError> {
        if self.form.doctor_id.is_empty() {
            return Err(BookingError::MissingField("Doctor"));
        }
        let date = self.form.date.ok_or(BookingError::MissingField("Date"))?;
        if date < self.clock.today() {
            return Err(BookingError::PastDate);
        }
        if self.form.time.is_empty() {
            return Err(BookingError::MissingField("Time"));
        }
        if self.form.symptoms.trim().is_empty() {
            return Err(BookingError::MissingField("Symptoms"));
        }

        Ok(BookAppointmentRequest {
            doctor_id: self.form.doctor_id.clone(),
            date,
            time: self.form.time.clone(),
            symptoms: self.form.symptoms.clone(),
            department: self.form.department.clone(),
        })
    }

    /// Submit the booking. On success the form and slot list reset for the
    /// next booking; on failure every field is preserved so the user can
    /// retry (a slot taken between fetch and submit surfaces here as an
    /// ordinary conflict error).
    pub async fn submit(&mut self) -> Result<Value, BookingError> {
        if self.submitting {
            return Err(BookingError::SubmitInFlight);
        }

        let request = self.validate()?;

        self.submitting = true;
        let result = self.api.book_appointment(&request).await;
        self.submitting = false;

        match result {
            Ok(response) => {
                self.reset();
                Ok(response)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn reset(&mut self) {
        self.form = BookingForm::default();
        self.slot_state = SlotState::Idle;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::FixedClock;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    fn doctor(id: &str, name: &str, specialization: &str) -> Doctor {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialization: specialization.to_string(),
            email: None,
            phone: None,
            gender: None,
            experience: None,
        }
    }

    /// Scripted in-memory backend.
    struct FakeApi {
        doctors: Vec<Doctor>,
        slots: Vec<String>,
        booked: Mutex<Vec<BookAppointmentRequest>>,
        book_error: Option<fn() -> ApiError>,
    }

    impl FakeApi {
        fn new(doctors: Vec<Doctor>, slots: &[&str]) -> Self {
            Self {
                doctors,
                slots: slots.iter().map(|s| s.to_string()).collect(),
                booked: Mutex::new(Vec::new()),
                book_error: None,
            }
        }
    }

    #[async_trait]
    impl BookingApi for FakeApi {
        async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
            Ok(self.doctors.clone())
        }

        async fn fetch_slots(&self, _doctor_id: &str, _date: NaiveDate) -> Result<Vec<String>, ApiError> {
            Ok(self.slots.clone())
        }

        async fn book_appointment(&self, request: &BookAppointmentRequest) -> Result<Value, ApiError> {
            if let Some(make_err) = self.book_error {
                return Err(make_err());
            }
            self.booked.lock().unwrap().push(request.clone());
            Ok(json!({"message": "Appointment booked successfully!"}))
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock {
            today: "2026-08-06".parse().unwrap(),
            minutes: 10 * 60 + 5,
        })
    }

    fn controller_with(api: FakeApi) -> BookingController {
        BookingController::new(Arc::new(api), clock())
    }

    #[tokio::test]
    async fn selecting_doctor_copies_department_and_clears_time() {
        let api = FakeApi::new(
            vec![
                doctor("d1", "Dr. Mehta", "Cardiology"),
                doctor("d2", "Dr. Iyer", "Dermatology"),
            ],
            &["09:00"],
        );
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        let request = ctl.select_date("2026-08-20".parse().unwrap());
        assert!(request.is_none(), "no doctor chosen yet");

        let request = ctl.select_doctor("d1").unwrap().unwrap();
        let _ = ctl.refresh_slots(request).await;
        ctl.select_time("09:00").unwrap();

        assert_eq!(ctl.form().department, "Cardiology");
        assert_eq!(ctl.form().time, "09:00");

        // Switching doctors invalidates the chosen time and re-derives the
        // department.
        ctl.select_doctor("d2").unwrap();
        assert_eq!(ctl.form().department, "Dermatology");
        assert_eq!(ctl.form().time, "");
    }

    #[tokio::test]
    async fn changing_date_clears_selected_time() {
        let api = FakeApi::new(vec![doctor("d1", "Dr. Mehta", "Cardiology")], &["09:00"]);
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        let request = ctl.select_doctor("d1").unwrap();
        assert!(request.is_none(), "no date chosen yet");

        let request = ctl.select_date("2026-08-20".parse().unwrap()).unwrap();
        let _ = ctl.refresh_slots(request).await;
        ctl.select_time("09:00").unwrap();
        assert_eq!(ctl.form().time, "09:00");

        ctl.select_date("2026-08-21".parse().unwrap());
        assert_eq!(ctl.form().time, "");
        assert!(ctl.slot_state().is_loading());
    }

    #[tokio::test]
    async fn stale_slot_response_is_discarded() {
        let api = FakeApi::new(
            vec![
                doctor("d1", "Dr. Mehta", "Cardiology"),
                doctor("d2", "Dr. Iyer", "Dermatology"),
            ],
            &[],
        );
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();
        ctl.select_date("2026-08-20".parse().unwrap());

        // Doctor A's fetch is dispatched, then the user switches to doctor B
        // before it completes.
        let request_a = ctl.select_doctor("d1").unwrap().unwrap();
        let request_b = ctl.select_doctor("d2").unwrap().unwrap();

        let late_result = Ok(vec!["09:00".to_string(), "09:30".to_string()]);
        assert_eq!(ctl.apply_slots(&request_a, late_result), SlotApply::Stale);
        assert!(ctl.slot_state().is_loading(), "B's fetch still pending");

        assert_eq!(
            ctl.apply_slots(&request_b, Ok(vec!["14:00".to_string()])),
            SlotApply::Applied
        );
        assert_eq!(ctl.slot_state().slots(), ["14:00".to_string()]);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_form_usable_with_empty_slots() {
        let api = FakeApi::new(vec![doctor("d1", "Dr. Mehta", "Cardiology")], &[]);
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();
        ctl.select_date("2026-08-20".parse().unwrap());
        let request = ctl.select_doctor("d1").unwrap().unwrap();

        let outcome = ctl.apply_slots(&request, Err(ApiError::Network("boom".into())));
        assert!(matches!(outcome, SlotApply::Failed(_)));
        assert_eq!(ctl.slot_state(), &SlotState::Loaded(vec![]));

        // Changing the date re-triggers resolution, which is the retry path.
        let retry = ctl.select_date("2026-08-21".parse().unwrap());
        assert!(retry.is_some());
    }

    #[tokio::test]
    async fn todays_slots_are_filtered_against_the_clock() {
        let api = FakeApi::new(
            vec![doctor("d1", "Dr. Mehta", "Cardiology")],
            &["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"],
        );
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        // Clock is pinned at 10:05 today.
        ctl.select_date("2026-08-06".parse().unwrap());
        let request = ctl.select_doctor("d1").unwrap().unwrap();
        let _ = ctl.refresh_slots(request).await;

        assert_eq!(
            ctl.slot_state().slots(),
            ["10:30".to_string(), "11:00".to_string(), "11:30".to_string()]
        );
    }

    #[tokio::test]
    async fn time_outside_loaded_list_is_rejected() {
        let api = FakeApi::new(vec![doctor("d1", "Dr. Mehta", "Cardiology")], &["09:00"]);
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();
        ctl.select_date("2026-08-20".parse().unwrap());
        let request = ctl.select_doctor("d1").unwrap().unwrap();
        let _ = ctl.refresh_slots(request).await;

        assert!(matches!(
            ctl.select_time("09:30"),
            Err(BookingError::SlotNotAvailable)
        ));
    }

    #[tokio::test]
    async fn validation_blocks_incomplete_or_past_submissions() {
        let api = FakeApi::new(vec![doctor("d1", "Dr. Mehta", "Cardiology")], &["09:00"]);
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        assert!(matches!(ctl.validate(), Err(BookingError::MissingField("Doctor"))));

        ctl.select_doctor("d1").unwrap();
        assert!(matches!(ctl.validate(), Err(BookingError::MissingField("Date"))));

        // Yesterday relative to the pinned clock.
        ctl.select_date("2026-08-05".parse().unwrap());
        assert!(matches!(ctl.validate(), Err(BookingError::PastDate)));

        let request = ctl.select_date("2026-08-20".parse().unwrap()).unwrap();
        let _ = ctl.refresh_slots(request).await;
        assert!(matches!(ctl.validate(), Err(BookingError::MissingField("Time"))));

        ctl.select_time("09:00").unwrap();
        assert!(matches!(
            ctl.validate(),
            Err(BookingError::MissingField("Symptoms"))
        ));

        ctl.set_symptoms("  ");
        assert!(matches!(
            ctl.validate(),
            Err(BookingError::MissingField("Symptoms"))
        ));

        ctl.set_symptoms("chest pain");
        assert!(ctl.validate().is_ok());
    }

    #[tokio::test]
    async fn submit_sends_department_captured_at_selection_time() {
        let api = FakeApi::new(
            vec![doctor("d1", "Dr. Mehta", "Cardiology")],
            &["09:00", "09:30"],
        );
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        ctl.select_date("2026-08-20".parse().unwrap());
        let request = ctl.select_doctor("d1").unwrap().unwrap();
        let _ = ctl.refresh_slots(request).await;
        ctl.select_time("09:30").unwrap();
        ctl.set_symptoms("chest pain");

        // The doctor list changing later must not affect the captured
        // department.
        ctl.doctors[0].specialization = "General Medicine".to_string();

        let payload = ctl.validate().unwrap();
        assert_eq!(payload.department, "Cardiology");
        assert_eq!(payload.doctor_id, "d1");
        assert_eq!(payload.time, "09:30");

        ctl.submit().await.unwrap();

        // Success resets the whole form.
        assert_eq!(ctl.form(), &BookingForm::default());
        assert_eq!(ctl.slot_state(), &SlotState::Idle);
    }

    #[tokio::test]
    async fn failed_submit_preserves_form_state() {
        let mut api = FakeApi::new(vec![doctor("d1", "Dr. Mehta", "Cardiology")], &["09:00"]);
        api.book_error = Some(|| ApiError::Conflict("Slot is no longer available".to_string()));
        let mut ctl = controller_with(api);
        ctl.load_doctors().await.unwrap();

        ctl.select_date("2026-08-20".parse().unwrap());
        let request = ctl.select_doctor("d1").unwrap().unwrap();
        let _ = ctl.refresh_slots(request).await;
        ctl.select_time("09:00").unwrap();
        ctl.set_symptoms("fever");

        let err = ctl.submit().await.unwrap_err();
        assert_eq!(err.user_message(), "Slot is no longer available");

        // Everything is still in place for a retry.
        assert_eq!(ctl.form().doctor_id, "d1");
        assert_eq!(ctl.form().time, "09:00");
        assert_eq!(ctl.form().symptoms, "fever");
        assert!(!ctl.is_submitting());
    }
}
