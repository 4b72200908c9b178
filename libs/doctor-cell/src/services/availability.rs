use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::{DayAvailability, ScheduleDay};

use crate::models::{AvailabilityEnvelope, AvailabilityError};

/// Edits the logged-in doctor's weekly schedule. The editor always holds a
/// fixed ordered seven-day week; saving replaces the whole week on the
/// backend, there are no per-day updates.
pub struct AvailabilityEditor {
    api: Arc<ApiClient>,
    week: Vec<DayAvailability>,
}

impl AvailabilityEditor {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            week: ScheduleDay::ALL
                .iter()
                .map(|&day| DayAvailability::unavailable(day))
                .collect(),
        }
    }

    /// Fetch the stored schedule and merge it over the empty week, so days
    /// the backend has never seen render as unavailable rather than missing.
    pub async fn load(&mut self) -> Result<(), AvailabilityError> {
        let envelope: AvailabilityEnvelope = self
            .api
            .request(Method::GET, "/doctor/availability", None)
            .await?;

        self.week = merge_week(envelope.availability);
        Ok(())
    }

    /// The full week, Monday first.
    pub fn week(&self) -> &[DayAvailability] {
        &self.week
    }

    pub fn set_day(&mut self, day: ScheduleDay, start_time: &str, end_time: &str) {
        if let Some(slot) = self.week.iter_mut().find(|s| s.day == day) {
            slot.start_time = start_time.to_string();
            slot.end_time = end_time.to_string();
        }
    }

    /// Every day with both ends set must have `start < end`; zero-padded
    /// "HH:MM" makes the lexicographic comparison equivalent to the
    /// chronological one. The first violating day is reported.
    pub fn validate(&self) -> Result<(), AvailabilityError> {
        for slot in &self.week {
            if slot.is_open() && slot.start_time >= slot.end_time {
                return Err(AvailabilityError::InvertedRange { day: slot.day });
            }
        }
        Ok(())
    }

    /// Validate, then replace the whole seven-day schedule. A validation
    /// failure means no request is sent at all.
    pub async fn save(&self) -> Result<(), AvailabilityError> {
        self.validate()?;

        debug!("Saving weekly availability");
        let envelope = AvailabilityEnvelope {
            availability: self.week.clone(),
        };
        let _: serde_json::Value = self
            .api
            .request(
                Method::PUT,
                "/doctor/availability",
                Some(serde_json::to_value(&envelope).unwrap_or_default()),
            )
            .await?;

        info!("Availability updated");
        Ok(())
    }
}

/// Expand a possibly-partial backend schedule into the fixed seven-day week.
/// Unknown-to-the-backend days come back empty (unavailable); duplicate
/// entries for a day keep the first one.
pub fn merge_week(partial: Vec<DayAvailability>) -> Vec<DayAvailability> {
    ScheduleDay::ALL
        .iter()
        .map(|&day| {
            partial
                .iter()
                .find(|slot| slot.day == day)
                .cloned()
                .unwrap_or_else(|| DayAvailability::unavailable(day))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(day: ScheduleDay, start: &str, end: &str) -> DayAvailability {
        DayAvailability {
            day,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn merge_fills_missing_days_in_fixed_order() {
        let week = merge_week(vec![
            open(ScheduleDay::Wednesday, "09:00", "12:00"),
            open(ScheduleDay::Monday, "10:00", "13:00"),
        ]);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, ScheduleDay::Monday);
        assert_eq!(week[0].start_time, "10:00");
        assert_eq!(week[1].day, ScheduleDay::Tuesday);
        assert!(!week[1].is_open());
        assert_eq!(week[2].start_time, "09:00");
        assert_eq!(week[6].day, ScheduleDay::Sunday);
    }

    #[test]
    fn merge_of_nothing_is_a_week_of_unavailable_days() {
        let week = merge_week(vec![]);
        assert_eq!(week.len(), 7);
        assert!(week.iter().all(|slot| !slot.is_open()));
    }
}
