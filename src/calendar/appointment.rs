use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{ClockTime, TimeError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("Appointment {id} ends at {end} which is not after its start {start}")]
    InvalidInterval {
        id: i64,
        start: ClockTime,
        end: ClockTime,
    },
    #[error("Appointment {id} has an invalid time: {source}")]
    InvalidTime {
        id: i64,
        #[source]
        source: TimeError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "scheduled" => Some(Self::Scheduled),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No Show",
        }
    }
}

/// One booking as the calendar sees it: a half-open `[start, end)` interval
/// on a groomer's day plus what the card displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AppointmentRecord")]
pub struct Appointment {
    pub id: i64,
    pub groomer_id: i64,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub pet_name: String,
    pub owner: String,
    pub service: String,
    pub groomer: String,
    pub status: Option<AppointmentStatus>,
    pub tags: Vec<String>,
}

/// Unchecked serde shape of an [`Appointment`].
#[derive(Deserialize)]
struct AppointmentRecord {
    id: i64,
    groomer_id: i64,
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
    #[serde(default)]
    pet_name: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    service: String,
    #[serde(default)]
    groomer: String,
    #[serde(default)]
    status: Option<AppointmentStatus>,
    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = AppointmentError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let mut appointment = Self::new(
            record.id,
            record.groomer_id,
            record.date,
            record.start,
            record.end,
        )?;
        appointment.pet_name = record.pet_name;
        appointment.owner = record.owner;
        appointment.service = record.service;
        appointment.groomer = record.groomer;
        appointment.status = record.status;
        appointment.tags = record.tags;
        Ok(appointment)
    }
}

impl Appointment {
    pub fn new(
        id: i64,
        groomer_id: i64,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self, AppointmentError> {
        if end <= start {
            return Err(AppointmentError::InvalidInterval { id, start, end });
        }
        Ok(Self {
            id,
            groomer_id,
            date,
            start,
            end,
            pet_name: String::new(),
            owner: String::new(),
            service: String::new(),
            groomer: String::new(),
            status: None,
            tags: Vec::new(),
        })
    }

    /// Builds an appointment from the `"9:00 AM"` strings the backend sends.
    pub fn from_display_times(
        id: i64,
        groomer_id: i64,
        date: NaiveDate,
        start: &str,
        end: &str,
    ) -> Result<Self, AppointmentError> {
        let start = start
            .parse()
            .map_err(|source| AppointmentError::InvalidTime { id, source })?;
        let end = end
            .parse()
            .map_err(|source| AppointmentError::InvalidTime { id, source })?;
        Self::new(id, groomer_id, date, start, end)
    }

    pub fn with_details(
        mut self,
        pet_name: impl Into<String>,
        owner: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        self.pet_name = pet_name.into();
        self.owner = owner.into();
        self.service = service.into();
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn start_minutes(&self) -> u32 {
        self.start.minutes()
    }

    pub fn end_minutes(&self) -> u32 {
        self.end.minutes()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    pub fn is_on(&self, groomer_id: i64, date: NaiveDate) -> bool {
        self.groomer_id == groomer_id && self.date == date
    }

    /// Half-open overlap: touching intervals do not overlap.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        intervals_overlap(
            self.start_minutes(),
            self.end_minutes(),
            other.start_minutes(),
            other.end_minutes(),
        )
    }
}

pub fn intervals_overlap(start_a: u32, end_a: u32, start_b: u32, end_b: u32) -> bool {
    start_a < end_b && end_a > start_b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Lunch,
    Meeting,
    Personal,
    Training,
    Cleaning,
    Maintenance,
    Vacation,
    Sick,
    #[serde(other)]
    Other,
}

impl BlockReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lunch => "Lunch Break",
            Self::Meeting => "Meeting",
            Self::Personal => "Personal Time",
            Self::Training => "Training",
            Self::Cleaning => "Equipment Cleaning",
            Self::Maintenance => "Maintenance",
            Self::Vacation => "Vacation",
            Self::Sick => "Sick Leave",
            Self::Other => "Other",
        }
    }
}

/// Time a groomer is unavailable. Rendered in the grid but never clickable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: i64,
    pub groomer_id: i64,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub reason: BlockReason,
    pub description: Option<String>,
}

impl TimeBlock {
    pub fn is_on(&self, groomer_id: i64, date: NaiveDate) -> bool {
        self.groomer_id == groomer_id && self.date == date
    }

    pub fn covers(&self, start: u32, end: u32) -> bool {
        intervals_overlap(self.start.minutes(), self.end.minutes(), start, end)
    }

    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(self.reason.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn appointment(id: i64, start: &str, end: &str) -> Appointment {
        Appointment::from_display_times(id, 1, date(), start, end).unwrap()
    }

    #[test]
    fn duration_calculated_from_interval() {
        let appt = appointment(1, "9:00 AM", "10:30 AM");
        assert_eq!(appt.duration_minutes(), 90);
    }

    #[test]
    fn overlapping_appointments_detected_both_ways() {
        let first = appointment(1, "9:00 AM", "10:00 AM");
        let second = appointment(2, "9:30 AM", "10:30 AM");

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
    }

    #[test]
    fn touching_appointments_do_not_overlap() {
        let first = appointment(1, "9:00 AM", "10:00 AM");
        let second = appointment(2, "10:00 AM", "11:00 AM");

        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let result = Appointment::from_display_times(7, 1, date(), "10:00 AM", "9:00 AM");
        assert!(matches!(result, Err(AppointmentError::InvalidInterval { id: 7, .. })));
    }

    #[test]
    fn zero_length_is_rejected() {
        let result = Appointment::from_display_times(7, 1, date(), "10:00 AM", "10:00 AM");
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_inverted_interval_is_rejected() {
        let json = r#"{"id":4,"groomer_id":1,"date":"2025-03-10",
            "start":"10:00 AM","end":"9:00 AM"}"#;
        let result: Result<Appointment, _> = serde_json::from_str(json);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("not after its start"), "{}", err);
    }

    #[test]
    fn deserialized_appointment_keeps_details() {
        let appt = appointment(4, "9:00 AM", "10:30 AM")
            .with_details("Biscuit", "Okafor", "Bath")
            .with_status(AppointmentStatus::Confirmed);
        let json = serde_json::to_string(&appt).unwrap();

        let parsed: Appointment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, appt);
        assert_eq!(parsed.duration_minutes(), 90);
    }

    #[test]
    fn malformed_time_is_rejected_with_id() {
        let result = Appointment::from_display_times(9, 1, date(), "10:00", "11:00 AM");
        assert!(matches!(result, Err(AppointmentError::InvalidTime { id: 9, .. })));
    }

    #[test]
    fn status_names_match_backend_values() {
        assert_eq!(AppointmentStatus::from_name("no_show"), Some(AppointmentStatus::NoShow));
        assert_eq!(
            AppointmentStatus::from_name("in_progress"),
            Some(AppointmentStatus::InProgress)
        );
        assert_eq!(AppointmentStatus::from_name("archived"), None);
    }

    #[test]
    fn block_label_prefers_description() {
        let mut block = TimeBlock {
            id: 1,
            groomer_id: 1,
            date: date(),
            start: "12:00 PM".parse().unwrap(),
            end: "1:00 PM".parse().unwrap(),
            reason: BlockReason::Lunch,
            description: None,
        };
        assert_eq!(block.label(), "Lunch Break");

        block.description = Some("Vet visit".to_string());
        assert_eq!(block.label(), "Vet visit");
    }

    #[test]
    fn block_covers_overlapping_range_only() {
        let block = TimeBlock {
            id: 1,
            groomer_id: 1,
            date: date(),
            start: "12:00 PM".parse().unwrap(),
            end: "12:30 PM".parse().unwrap(),
            reason: BlockReason::Lunch,
            description: None,
        };
        assert!(block.covers(12 * 60, 13 * 60));
        assert!(!block.covers(11 * 60, 12 * 60));
    }
}
