use crate::calendar::Appointment;
use crate::calendar::time::MINUTES_PER_HOUR;
use crate::storage::config::CalendarConfig;
use crate::ui::overlap::{find_overlaps, stack_position, StackPosition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub hour_height_px: f32,
    pub stack_offset_px: f32,
    pub base_z_index: i32,
    pub active_z_boost: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from(&CalendarConfig::default())
    }
}

impl From<&CalendarConfig> for LayoutMetrics {
    fn from(config: &CalendarConfig) -> Self {
        Self {
            hour_height_px: config.hour_height_px,
            stack_offset_px: config.stack_offset_px,
            base_z_index: config.base_z_index,
            active_z_boost: config.active_z_boost,
        }
    }
}

/// Card placement relative to the top-left of the hour row it starts in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub top: f32,
    pub height: f32,
    pub left: f32,
    pub z_index: i32,
}

/// Hour grid lines strictly inside `(start, end)`; each adds a 1px border.
pub fn hour_boundaries_crossed(start: u32, end: u32) -> u32 {
    if end <= start {
        return 0;
    }
    (end - 1) / MINUTES_PER_HOUR - start / MINUTES_PER_HOUR
}

pub fn vertical_extent(start: u32, end: u32, metrics: &LayoutMetrics) -> (f32, f32) {
    let minute_px = metrics.hour_height_px / MINUTES_PER_HOUR as f32;
    let top = (start % MINUTES_PER_HOUR) as f32 * minute_px;
    let height = end.saturating_sub(start) as f32 * minute_px
        + hour_boundaries_crossed(start, end) as f32;
    (top, height)
}

pub fn z_index_for(
    appointment: &Appointment,
    position: StackPosition,
    active_id: Option<i64>,
    metrics: &LayoutMetrics,
) -> i32 {
    if active_id == Some(appointment.id) {
        metrics.base_z_index + metrics.active_z_boost
    } else {
        metrics.base_z_index + position.rank as i32
    }
}

pub fn card_geometry(
    appointment: &Appointment,
    appointments: &[Appointment],
    active_id: Option<i64>,
    metrics: &LayoutMetrics,
) -> CardGeometry {
    let position = stack_position(appointment, appointments);
    geometry_for_position(appointment, position, active_id, metrics)
}

pub fn geometry_for_position(
    appointment: &Appointment,
    position: StackPosition,
    active_id: Option<i64>,
    metrics: &LayoutMetrics,
) -> CardGeometry {
    let (top, height) = vertical_extent(
        appointment.start_minutes(),
        appointment.end_minutes(),
        metrics,
    );
    let left = if position.is_stacked() {
        position.rank as f32 * metrics.stack_offset_px
    } else {
        0.0
    };

    CardGeometry {
        top,
        height,
        left,
        z_index: z_index_for(appointment, position, active_id, metrics),
    }
}

/// Paint order: z-index first, then later-starting cards above earlier ones.
pub fn paint_order_key(
    appointment: &Appointment,
    appointments: &[Appointment],
    active_id: Option<i64>,
    metrics: &LayoutMetrics,
) -> (i32, u32, i64) {
    let position = stack_position(appointment, appointments);
    (
        z_index_for(appointment, position, active_id, metrics),
        appointment.start_minutes(),
        appointment.id,
    )
}

/// Whether the card is the one painted on top of everything it overlaps.
pub fn is_front(
    appointment: &Appointment,
    appointments: &[Appointment],
    active_id: Option<i64>,
    metrics: &LayoutMetrics,
) -> bool {
    let own = paint_order_key(appointment, appointments, active_id, metrics);
    find_overlaps(appointment, appointments)
        .into_iter()
        .all(|other| paint_order_key(other, appointments, active_id, metrics) < own)
}
