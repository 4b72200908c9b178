use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;

use shared_http::ApiClient;
use shared_models::{minutes_since_midnight, ApiError, Doctor};

use crate::models::{BookAppointmentRequest, SlotsResponse};

use super::clock::Clock;

/// Backend operations the booking workflow needs. The slot computation
/// itself (availability minus existing bookings) lives server-side; this
/// client only fetches the result.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError>;

    async fn fetch_slots(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<String>, ApiError>;

    async fn book_appointment(&self, request: &BookAppointmentRequest) -> Result<Value, ApiError>;
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.request(Method::GET, "/patients/doctors", None).await
    }

    async fn fetch_slots(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<String>, ApiError> {
        let response: SlotsResponse = self
            .request_with_query(
                Method::GET,
                "/appointments/slots",
                &[
                    ("doctorId", doctor_id.to_string()),
                    ("date", date.to_string()),
                ],
                None,
            )
            .await?;
        Ok(response.slots)
    }

    async fn book_appointment(&self, request: &BookAppointmentRequest) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            "/appointments",
            Some(serde_json::to_value(request).unwrap_or_default()),
        )
        .await
    }
}

/// The one piece of slot logic owned by the client: when the requested date
/// is today, keep only slots strictly after the current time. Any other date
/// passes through untouched. Comparison is on minutes-since-midnight
/// integers; a slot that does not parse as "HH:MM" cannot be proven bookable
/// today and is dropped with the past ones.
pub fn filter_past_slots(slots: Vec<String>, date: NaiveDate, clock: &dyn Clock) -> Vec<String> {
    if date != clock.today() {
        return slots;
    }

    let now_minutes = clock.now_minutes();
    slots
        .into_iter()
        .filter(|slot| {
            minutes_since_midnight(slot)
                .map(|slot_minutes| slot_minutes > now_minutes)
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::FixedClock;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    fn slots(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn future_dates_pass_through_unfiltered() {
        let clock = FixedClock {
            today: date("2026-08-06"),
            minutes: 10 * 60 + 5,
        };
        let input = slots(&["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]);

        let out = filter_past_slots(input.clone(), date("2026-08-20"), &clock);
        assert_eq!(out, input);
    }

    #[test]
    fn today_drops_slots_at_or_before_now() {
        // 10:05 local: 09:00/09:30/10:00 are gone, the rest stay.
        let clock = FixedClock {
            today: date("2026-08-06"),
            minutes: 10 * 60 + 5,
        };
        let input = slots(&["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]);

        let out = filter_past_slots(input, date("2026-08-06"), &clock);
        assert_eq!(out, slots(&["10:30", "11:00", "11:30"]));
    }

    #[test]
    fn slot_equal_to_now_is_not_bookable() {
        let clock = FixedClock {
            today: date("2026-08-06"),
            minutes: 10 * 60 + 30,
        };
        let out = filter_past_slots(slots(&["10:30", "10:31"]), date("2026-08-06"), &clock);
        assert_eq!(out, slots(&["10:31"]));
    }

    #[test]
    fn malformed_slots_are_dropped_on_today_only() {
        let clock = FixedClock {
            today: date("2026-08-06"),
            minutes: 9 * 60,
        };

        let out = filter_past_slots(slots(&["not-a-time", "09:30"]), date("2026-08-06"), &clock);
        assert_eq!(out, slots(&["09:30"]));

        // On other dates the list is the backend's business, verbatim.
        let out = filter_past_slots(slots(&["not-a-time", "09:30"]), date("2026-09-01"), &clock);
        assert_eq!(out, slots(&["not-a-time", "09:30"]));
    }

    #[test]
    fn clock_time_is_not_consulted_for_other_dates() {
        let mut clock = crate::services::clock::MockClock::new();
        clock
            .expect_today()
            .return_const(NaiveDate::parse_from_str("2026-08-06", "%Y-%m-%d").unwrap());
        clock.expect_now_minutes().never();

        let out = filter_past_slots(slots(&["09:00"]), date("2026-08-07"), &clock);
        assert_eq!(out, slots(&["09:00"]));
    }

    #[test]
    fn empty_input_stays_empty() {
        let clock = FixedClock {
            today: date("2026-08-06"),
            minutes: 0,
        };
        let out = filter_past_slots(vec![], date("2026-08-06"), &clock);
        assert!(out.is_empty());
    }
}
