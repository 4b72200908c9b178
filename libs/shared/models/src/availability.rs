use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekday names as the availability API spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ScheduleDay {
    /// Fixed editor order, Monday first.
    pub const ALL: [ScheduleDay; 7] = [
        ScheduleDay::Monday,
        ScheduleDay::Tuesday,
        ScheduleDay::Wednesday,
        ScheduleDay::Thursday,
        ScheduleDay::Friday,
        ScheduleDay::Saturday,
        ScheduleDay::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleDay::Monday => "Monday",
            ScheduleDay::Tuesday => "Tuesday",
            ScheduleDay::Wednesday => "Wednesday",
            ScheduleDay::Thursday => "Thursday",
            ScheduleDay::Friday => "Friday",
            ScheduleDay::Saturday => "Saturday",
            ScheduleDay::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for ScheduleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weekday's open interval. Empty strings mean the doctor is
/// unavailable that day; when both ends are set the invariant
/// `start_time < end_time` (lexicographic on zero-padded "HH:MM") holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub day: ScheduleDay,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl DayAvailability {
    pub fn unavailable(day: ScheduleDay) -> Self {
        Self {
            day,
            start_time: String::new(),
            end_time: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.start_time.is_empty() && !self.end_time.is_empty()
    }
}
