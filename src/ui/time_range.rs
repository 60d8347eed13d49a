use crate::calendar::Appointment;
use crate::calendar::time::{format_hour_to_time_string, MINUTES_PER_HOUR};

pub const LAST_HOUR_OF_DAY: u32 = 23;
pub const END_BUFFER_HOURS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleHour {
    pub hour: u32,
    pub label: String,
}

/// Last hour row to render: the default end, pushed out to one hour past the
/// latest appointment end (rounded up), never past 11 PM.
pub fn visible_end_hour(appointments: &[Appointment], default_end: u32) -> u32 {
    let computed = appointments
        .iter()
        .map(Appointment::end_minutes)
        .max()
        .map(|latest| latest.div_ceil(MINUTES_PER_HOUR) + END_BUFFER_HOURS)
        .unwrap_or(0);

    computed.max(default_end).min(LAST_HOUR_OF_DAY)
}

/// Inclusive hourly sequence from `default_start` to the visible end hour.
pub fn visible_hours(
    appointments: &[Appointment],
    default_start: u32,
    default_end: u32,
) -> Vec<VisibleHour> {
    let start = default_start.min(LAST_HOUR_OF_DAY);
    let end = visible_end_hour(appointments, default_end).max(start);

    (start..=end)
        .filter_map(|hour| {
            format_hour_to_time_string(hour)
                .ok()
                .map(|label| VisibleHour { hour, label })
        })
        .collect()
}
