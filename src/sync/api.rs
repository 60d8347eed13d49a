use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::app::{CalendarData, SlotSelection};
use crate::calendar::{
    Appointment, AppointmentStatus, BlockReason, CalendarGroomer, ClockTime, TimeBlock,
};
use crate::storage::config::ApiConfig;

pub const MIN_BOOKING_MINUTES: u32 = 15;
pub const MAX_BOOKING_MINUTES: u32 = 480;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Invalid booking: {0}")]
    InvalidBooking(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAppointmentItem {
    pub id: i64,
    pub time: String,
    pub end_time: String,
    pub pet_name: String,
    pub owner: String,
    pub service: String,
    pub groomer: String,
    pub groomer_id: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimeBlockItem {
    pub id: i64,
    pub time: String,
    pub end_time: String,
    pub reason: BlockReason,
    #[serde(default)]
    pub reason_label: String,
    pub description: Option<String>,
    pub groomer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroomerWithAppointments {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub appointments: Vec<DailyAppointmentItem>,
    #[serde(default)]
    pub time_blocks: Vec<DailyTimeBlockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAppointmentsResponse {
    pub date: NaiveDate,
    #[serde(default)]
    pub total_appointments: usize,
    pub groomers: Vec<GroomerWithAppointments>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAppointmentsResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DailyAppointmentsResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSearchResult {
    pub pet_id: i64,
    pub pet_name: String,
    pub family_name: String,
    pub phone: Option<String>,
    pub customer_user_name: String,
    pub species: String,
    pub breed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub pet_id: i64,
    pub staff_id: i64,
    pub service_ids: Vec<i64>,
    pub appointment_datetime: NaiveDateTime,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub id: i64,
    pub pet_name: String,
    pub staff_name: String,
    pub appointment_datetime: String,
    pub duration_minutes: u32,
    pub status: String,
}

impl BookingRequest {
    /// Books `pet_id` into an empty slot the calendar reported.
    pub fn for_slot(
        slot: SlotSelection,
        pet_id: i64,
        duration_minutes: u32,
    ) -> Result<Self, ApiError> {
        if !(MIN_BOOKING_MINUTES..=MAX_BOOKING_MINUTES).contains(&duration_minutes) {
            return Err(ApiError::InvalidBooking(format!(
                "duration must be between {} and {} minutes, got {}",
                MIN_BOOKING_MINUTES, MAX_BOOKING_MINUTES, duration_minutes
            )));
        }
        let time = chrono::NaiveTime::from_hms_opt(slot.time.hour(), slot.time.minute(), 0)
            .ok_or_else(|| ApiError::InvalidBooking(format!("invalid slot time {}", slot.time)))?;

        Ok(Self {
            pet_id,
            staff_id: slot.groomer_id,
            service_ids: Vec::new(),
            appointment_datetime: slot.date.and_time(time),
            duration_minutes,
            notes: None,
        })
    }
}

impl DailyAppointmentsResponse {
    /// Converts the listing into engine input. Records with unusable times
    /// are logged and dropped; the rest of the day still renders.
    pub fn into_calendar_data(self) -> CalendarData {
        let date = self.date;
        let mut data = CalendarData::default();

        for groomer in self.groomers {
            data.groomers.push(CalendarGroomer::new(groomer.id, groomer.name));

            for item in groomer.appointments {
                match item.into_appointment(date) {
                    Ok(appointment) => data.appointments.push(appointment),
                    Err(e) => tracing::warn!("Skipping appointment on {}: {}", date, e),
                }
            }

            for item in groomer.time_blocks {
                match item.into_time_block(date) {
                    Some(block) => data.time_blocks.push(block),
                    None => tracing::warn!("Skipping malformed time block on {}", date),
                }
            }
        }

        data
    }
}

impl DailyAppointmentItem {
    pub fn into_appointment(
        self,
        date: NaiveDate,
    ) -> Result<Appointment, crate::calendar::AppointmentError> {
        let mut appointment = Appointment::from_display_times(
            self.id,
            self.groomer_id,
            date,
            &self.time,
            &self.end_time,
        )?;
        appointment.pet_name = self.pet_name;
        appointment.owner = self.owner;
        appointment.service = self.service;
        appointment.groomer = self.groomer;
        appointment.tags = self.tags;
        appointment.status = self.status.as_deref().and_then(AppointmentStatus::from_name);
        Ok(appointment)
    }
}

impl DailyTimeBlockItem {
    pub fn into_time_block(self, date: NaiveDate) -> Option<TimeBlock> {
        let start: ClockTime = self.time.parse().ok()?;
        let end: ClockTime = self.end_time.parse().ok()?;
        if end <= start {
            return None;
        }
        Some(TimeBlock {
            id: self.id,
            groomer_id: self.groomer_id,
            date,
            start,
            end,
            reason: self.reason,
            description: self.description,
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroomingApi: Send + Sync {
    async fn fetch_daily(&self, date: NaiveDate) -> Result<DailyAppointmentsResponse, ApiError>;

    async fn fetch_weekly(
        &self,
        start_date: NaiveDate,
    ) -> Result<WeeklyAppointmentsResponse, ApiError>;

    async fn search_pets(&self, query: &str) -> Result<Vec<PetSearchResult>, ApiError>;

    async fn create_appointment(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError>;
}

pub struct GroomingApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl GroomingApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check_status(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        tracing::debug!("{} response status: {}", what, status);

        if status == 401 {
            tracing::error!("Authentication failed for {}", what);
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 404 {
            tracing::error!("Not found: {}", what);
            return Err(ApiError::NotFound(what.to_string()));
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded for {}", what);
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("{} failed. Status: {}, Body: {}", what, status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        Ok(response)
    }
}

#[async_trait]
impl GroomingApi for GroomingApiClient {
    async fn fetch_daily(&self, date: NaiveDate) -> Result<DailyAppointmentsResponse, ApiError> {
        let date_param = date.format("%Y-%m-%d").to_string();
        tracing::info!("Fetching daily appointments for {}", date_param);

        let response = self
            .request(reqwest::Method::GET, "/api/appointments/daily")
            .query(&[("date", date_param.as_str())])
            .send()
            .await?;

        let response = Self::check_status(response, "daily appointments").await?;
        let daily: DailyAppointmentsResponse = response.json().await?;

        tracing::info!(
            "Fetched {} appointments across {} groomers",
            daily.total_appointments,
            daily.groomers.len()
        );
        Ok(daily)
    }

    async fn fetch_weekly(
        &self,
        start_date: NaiveDate,
    ) -> Result<WeeklyAppointmentsResponse, ApiError> {
        let date_param = start_date.format("%Y-%m-%d").to_string();
        tracing::info!("Fetching weekly appointments starting {}", date_param);

        let response = self
            .request(reqwest::Method::GET, "/api/appointments/weekly")
            .query(&[("start_date", date_param.as_str())])
            .send()
            .await?;

        let response = Self::check_status(response, "weekly appointments").await?;
        let weekly: WeeklyAppointmentsResponse = response.json().await?;

        tracing::info!("Fetched {} days of appointments", weekly.days.len());
        Ok(weekly)
    }

    async fn search_pets(&self, query: &str) -> Result<Vec<PetSearchResult>, ApiError> {
        tracing::debug!("Searching pets for {:?}", query);

        let response = self
            .request(reqwest::Method::GET, "/api/pets/search")
            .query(&[("q", query)])
            .send()
            .await?;

        let response = Self::check_status(response, "pet search").await?;
        Ok(response.json().await?)
    }

    async fn create_appointment(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        tracing::info!(
            "Booking pet {} with staff {} at {}",
            request.pet_id,
            request.staff_id,
            request.appointment_datetime
        );

        let response = self
            .request(reqwest::Method::POST, "/api/appointments")
            .json(request)
            .send()
            .await?;

        let response = Self::check_status(response, "create appointment").await?;
        let confirmation: BookingConfirmation = response.json().await?;

        tracing::info!("Appointment created with ID {}", confirmation.id);
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn daily_body() -> serde_json::Value {
        json!({
            "date": "2025-03-10",
            "total_appointments": 3,
            "groomers": [
                {
                    "id": 1,
                    "name": "Dana Whitfield",
                    "appointments": [
                        {
                            "id": 10,
                            "time": "9:00 AM",
                            "end_time": "10:00 AM",
                            "pet_name": "Biscuit",
                            "owner": "Okafor",
                            "service": "Full Groom",
                            "groomer": "Dana Whitfield",
                            "groomer_id": 1,
                            "tags": ["nervous"],
                            "status": "confirmed"
                        },
                        {
                            "id": 11,
                            "time": "14:00",
                            "end_time": "3:00 PM",
                            "pet_name": "Mochi",
                            "owner": "Lindqvist",
                            "service": "Bath",
                            "groomer": "Dana Whitfield",
                            "groomer_id": 1,
                            "tags": [],
                            "status": null
                        }
                    ],
                    "time_blocks": [
                        {
                            "id": 5,
                            "time": "12:00 PM",
                            "end_time": "12:30 PM",
                            "reason": "lunch",
                            "reason_label": "Lunch Break",
                            "description": null,
                            "groomer_id": 1
                        }
                    ]
                },
                {
                    "id": 2,
                    "name": "Luis Ortega",
                    "appointments": [
                        {
                            "id": 12,
                            "time": "11:30 AM",
                            "end_time": "1:00 PM",
                            "pet_name": "Pepper",
                            "owner": "Haddad",
                            "service": "Nail Trim",
                            "groomer": "Luis Ortega",
                            "groomer_id": 2,
                            "status": "archived"
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn daily_response_converts_to_calendar_data() {
        let daily: DailyAppointmentsResponse = serde_json::from_value(daily_body()).unwrap();

        let data = daily.into_calendar_data();

        assert_eq!(
            data.groomers,
            vec![
                CalendarGroomer::new(1, "Dana Whitfield"),
                CalendarGroomer::new(2, "Luis Ortega"),
            ]
        );
        let ids: Vec<i64> = data.appointments.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(data.appointments[0].status, Some(AppointmentStatus::Confirmed));
        assert_eq!(data.appointments[0].tags, vec!["nervous".to_string()]);
        assert_eq!(data.appointments[0].date, date(2025, 3, 10));
        assert_eq!(data.appointments[1].status, None);
        assert_eq!(data.time_blocks.len(), 1);
        assert_eq!(data.time_blocks[0].reason, BlockReason::Lunch);
    }

    #[test]
    fn unknown_block_reason_maps_to_other() {
        let item: DailyTimeBlockItem = serde_json::from_value(json!({
            "id": 1,
            "time": "8:00 AM",
            "end_time": "9:00 AM",
            "reason": "dentist",
            "description": "Dentist",
            "groomer_id": 3
        }))
        .unwrap();

        assert_eq!(item.reason, BlockReason::Other);
    }

    #[test]
    fn inverted_time_block_is_dropped() {
        let item = DailyTimeBlockItem {
            id: 1,
            time: "9:00 AM".to_string(),
            end_time: "8:00 AM".to_string(),
            reason: BlockReason::Meeting,
            reason_label: "Meeting".to_string(),
            description: None,
            groomer_id: 1,
        };

        assert!(item.into_time_block(date(2025, 3, 10)).is_none());
    }

    #[test]
    fn booking_for_slot_uses_slot_groomer_and_time() {
        let slot = SlotSelection {
            groomer_id: 4,
            date: date(2025, 3, 10),
            time: ClockTime::from_hm(14, 0).unwrap(),
        };

        let request = BookingRequest::for_slot(slot, 77, 90).unwrap();

        assert_eq!(request.staff_id, 4);
        assert_eq!(request.pet_id, 77);
        assert_eq!(
            request.appointment_datetime,
            date(2025, 3, 10).and_hms_opt(14, 0, 0).unwrap()
        );
    }

    #[test]
    fn booking_duration_outside_limits_is_rejected() {
        let slot = SlotSelection {
            groomer_id: 4,
            date: date(2025, 3, 10),
            time: ClockTime::from_hm(14, 0).unwrap(),
        };

        assert!(matches!(
            BookingRequest::for_slot(slot, 77, 10),
            Err(ApiError::InvalidBooking(_))
        ));
        assert!(matches!(
            BookingRequest::for_slot(slot, 77, 481),
            Err(ApiError::InvalidBooking(_))
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GroomingApiClient::new("http://localhost:8000/".to_string());
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn fetch_daily_sends_date_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments/daily"))
            .and(query_param("date", "2025-03-10"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroomingApiClient::new(server.uri()).with_token("secret".to_string());
        let daily = client.fetch_daily(date(2025, 3, 10)).await.unwrap();

        assert_eq!(daily.total_appointments, 3);
        assert_eq!(daily.groomers.len(), 2);
    }

    #[tokio::test]
    async fn fetch_weekly_sends_start_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments/weekly"))
            .and(query_param("start_date", "2025-03-10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "start_date": "2025-03-10",
                "end_date": "2025-03-16",
                "days": [daily_body()]
            })))
            .mount(&server)
            .await;

        let client = GroomingApiClient::new(server.uri());
        let weekly = client.fetch_weekly(date(2025, 3, 10)).await.unwrap();

        assert_eq!(weekly.end_date, date(2025, 3, 16));
        assert_eq!(weekly.days.len(), 1);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments/daily"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = GroomingApiClient::new(server.uri());
        let result = client.fetch_daily(date(2025, 3, 10)).await;

        assert!(matches!(result, Err(ApiError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pets/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Failed to search pets"))
            .mount(&server)
            .await;

        let client = GroomingApiClient::new(server.uri());
        let result = client.search_pets("bis").await;

        match result {
            Err(ApiError::RequestError(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("Failed to search pets"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn search_pets_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pets/search"))
            .and(query_param("q", "bis cuit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "pet_id": 7,
                    "pet_name": "Biscuit",
                    "family_name": "Okafor",
                    "phone": "555-0102",
                    "customer_user_name": "Ada Okafor",
                    "species": "dog",
                    "breed": "Beagle"
                }
            ])))
            .mount(&server)
            .await;

        let client = GroomingApiClient::new(server.uri());
        let results = client.search_pets("bis cuit").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pet_name, "Biscuit");
        assert_eq!(results[0].breed.as_deref(), Some("Beagle"));
    }

    #[tokio::test]
    async fn create_appointment_posts_booking() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/appointments"))
            .and(body_partial_json(json!({
                "pet_id": 7,
                "staff_id": 1,
                "appointment_datetime": "2025-03-10T14:00:00",
                "duration_minutes": 60
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 99,
                "pet_name": "Biscuit",
                "staff_name": "Dana Whitfield",
                "appointment_datetime": "2025-03-10T14:00:00",
                "duration_minutes": 60,
                "status": "scheduled"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let slot = SlotSelection {
            groomer_id: 1,
            date: date(2025, 3, 10),
            time: ClockTime::from_hm(14, 0).unwrap(),
        };
        let request = BookingRequest::for_slot(slot, 7, 60).unwrap();

        let client = GroomingApiClient::new(server.uri());
        let confirmation = client.create_appointment(&request).await.unwrap();

        assert_eq!(confirmation.id, 99);
        assert_eq!(confirmation.status, "scheduled");
    }
}
