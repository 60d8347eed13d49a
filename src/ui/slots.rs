use chrono::NaiveDate;

use crate::calendar::appointment::intervals_overlap;
use crate::calendar::time::{parse_time_to_minutes, MINUTES_PER_HOUR};
use crate::calendar::{Appointment, TimeBlock, TimeError};

/// `[start, end)` minutes of the hourly slot.
pub fn slot_bounds(hour: u32) -> (u32, u32) {
    let start = hour * MINUTES_PER_HOUR;
    (start, start + MINUTES_PER_HOUR)
}

/// Maps an hour label such as `"2:00 PM"` back to its slot hour.
pub fn slot_hour_from_label(label: &str) -> Result<u32, TimeError> {
    parse_time_to_minutes(label).map(|minutes| minutes / MINUTES_PER_HOUR)
}

/// Appointments that start inside the slot, earliest first.
pub fn appointments_in_slot<'a>(
    appointments: &'a [Appointment],
    groomer_id: i64,
    date: NaiveDate,
    hour: u32,
) -> Vec<&'a Appointment> {
    let (slot_start, slot_end) = slot_bounds(hour);
    let mut in_slot: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.is_on(groomer_id, date))
        .filter(|a| a.start_minutes() >= slot_start && a.start_minutes() < slot_end)
        .collect();
    in_slot.sort_by_key(|a| (a.start_minutes(), a.id));
    in_slot
}

/// True when any appointment covers part of the slot, including the tail of
/// one that started in an earlier hour.
pub fn is_slot_occupied(
    appointments: &[Appointment],
    groomer_id: i64,
    date: NaiveDate,
    hour: u32,
) -> bool {
    let (slot_start, slot_end) = slot_bounds(hour);
    appointments
        .iter()
        .filter(|a| a.is_on(groomer_id, date))
        .any(|a| intervals_overlap(a.start_minutes(), a.end_minutes(), slot_start, slot_end))
}

pub fn is_slot_blocked(blocks: &[TimeBlock], groomer_id: i64, date: NaiveDate, hour: u32) -> bool {
    let (slot_start, slot_end) = slot_bounds(hour);
    blocks
        .iter()
        .filter(|b| b.is_on(groomer_id, date))
        .any(|b| b.covers(slot_start, slot_end))
}

pub fn groomer_appointment_count(
    appointments: &[Appointment],
    groomer_id: i64,
    date: NaiveDate,
) -> usize {
    appointments
        .iter()
        .filter(|a| a.is_on(groomer_id, date))
        .count()
}
