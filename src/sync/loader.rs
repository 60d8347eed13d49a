use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::app::CalendarData;
use crate::calendar::ViewMode;
use crate::calendar::date::week_of_date;
use crate::sync::api::{ApiError, BookingConfirmation, BookingRequest, GroomingApi};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
}

/// Fetches what a calendar view shows and submits bookings made from it.
pub struct CalendarLoader<A> {
    api: Arc<A>,
}

impl<A> Clone for CalendarLoader<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: GroomingApi> CalendarLoader<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn load(&self, view: ViewMode, anchor: NaiveDate) -> Result<CalendarData, LoadError> {
        match view {
            ViewMode::Day => {
                let daily = self.api.fetch_daily(anchor).await?;
                Ok(daily.into_calendar_data())
            }
            ViewMode::Week => {
                let weekly = self.api.fetch_weekly(week_of_date(anchor)).await?;
                let mut data = CalendarData::default();
                for day in weekly.days {
                    merge_into(&mut data, day.into_calendar_data());
                }
                tracing::debug!(
                    "Loaded week of {} with {} appointments",
                    weekly.start_date,
                    data.appointments.len()
                );
                Ok(data)
            }
        }
    }

    pub async fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation, LoadError> {
        Ok(self.api.create_appointment(request).await?)
    }
}

/// Every day of a week lists the full roster; groomers are kept once, in
/// first-seen order.
fn merge_into(data: &mut CalendarData, day: CalendarData) {
    for groomer in day.groomers {
        if !data.groomers.iter().any(|g| g.id == groomer.id) {
            data.groomers.push(groomer);
        }
    }
    data.appointments.extend(day.appointments);
    data.time_blocks.extend(day.time_blocks);
}
