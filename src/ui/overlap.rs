use crate::calendar::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackPosition {
    /// 0-based position in the start-sorted overlap group, target included.
    pub rank: usize,
    /// Other appointments that intersect the target.
    pub overlap_count: usize,
}

impl StackPosition {
    pub fn is_stacked(&self) -> bool {
        self.overlap_count > 0
    }
}

fn stack_order(appointment: &Appointment) -> (u32, i64) {
    (appointment.start_minutes(), appointment.id)
}

/// Other appointments for the same groomer/date whose intervals intersect
/// the target.
pub fn find_overlaps<'a>(
    target: &Appointment,
    appointments: &'a [Appointment],
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|a| a.id != target.id)
        .filter(|a| a.is_on(target.groomer_id, target.date))
        .filter(|a| a.overlaps(target))
        .collect()
}

/// The target plus its overlaps, ordered by start time (id breaks ties).
pub fn overlap_group<'a>(
    target: &'a Appointment,
    appointments: &'a [Appointment],
) -> Vec<&'a Appointment> {
    let mut group = find_overlaps(target, appointments);
    group.push(target);
    group.sort_by_key(|a| stack_order(a));
    group
}

pub fn stack_position(target: &Appointment, appointments: &[Appointment]) -> StackPosition {
    let group = overlap_group(target, appointments);
    let rank = group
        .iter()
        .position(|a| a.id == target.id)
        .unwrap_or(0);

    StackPosition {
        rank,
        overlap_count: group.len() - 1,
    }
}

pub fn overlap_rank(target: &Appointment, appointments: &[Appointment]) -> usize {
    stack_position(target, appointments).rank
}
