use crate::app::CalendarView;
use crate::calendar::{Appointment, CalendarDate, CalendarGroomer, TimeBlock, ViewMode};
use crate::ui::card::{geometry_for_position, vertical_extent, CardGeometry};
use crate::ui::overlap::{stack_position, StackPosition};
use crate::ui::slots::{
    appointments_in_slot, groomer_appointment_count, is_slot_blocked, is_slot_occupied,
};
use crate::ui::time_range::VisibleHour;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub hours: Vec<VisibleHour>,
    pub columns: Vec<GridColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub groomer: CalendarGroomer,
    pub date: CalendarDate,
    pub appointment_count: usize,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub hour: u32,
    pub label: String,
    pub cards: Vec<CardLayout>,
    pub blocks: Vec<BlockLayout>,
    pub occupied: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub appointment: Appointment,
    pub geometry: CardGeometry,
    pub position: StackPosition,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub block: TimeBlock,
    pub top: f32,
    pub height: f32,
}

impl GridRow {
    /// Whether the empty-slot click target is rendered for this row.
    pub fn accepts_slot_click(&self) -> bool {
        !self.occupied && !self.blocked
    }
}

impl GridColumn {
    pub fn cards(&self) -> impl Iterator<Item = &CardLayout> {
        self.rows.iter().flat_map(|row| row.cards.iter())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockLayout> {
        self.rows.iter().flat_map(|row| row.blocks.iter())
    }

    pub fn row_for_hour(&self, hour: u32) -> Option<&GridRow> {
        self.rows.iter().find(|row| row.hour == hour)
    }
}

impl CalendarGrid {
    /// Card painted on top at `minute` whose left edge is at or before
    /// `left_px` within the column.
    pub fn topmost_card_at(&self, column: usize, minute: u32, left_px: f32) -> Option<&CardLayout> {
        self.columns
            .get(column)?
            .cards()
            .filter(|card| {
                let appointment = &card.appointment;
                appointment.start_minutes() <= minute && minute < appointment.end_minutes()
            })
            .filter(|card| card.geometry.left <= left_px)
            .max_by_key(|card| card.paint_key())
    }

    /// Cards of a column in the order they should be painted.
    pub fn paint_order(&self, column: usize) -> Vec<&CardLayout> {
        let Some(column) = self.columns.get(column) else {
            return Vec::new();
        };
        let mut cards: Vec<&CardLayout> = column.cards().collect();
        cards.sort_by_key(|card| card.paint_key());
        cards
    }
}

impl CardLayout {
    pub fn paint_key(&self) -> (i32, u32, i64) {
        (
            self.geometry.z_index,
            self.appointment.start_minutes(),
            self.appointment.id,
        )
    }
}

/// Day view: one column per groomer. Week view: one column per date for the
/// focused groomer, or for every groomer when none is focused.
fn column_targets(state: &CalendarView) -> Vec<(CalendarGroomer, CalendarDate)> {
    let dates = state.dates();
    let groomers: Vec<&CalendarGroomer> = match (state.view, state.focused_groomer) {
        (ViewMode::Week, Some(id)) => state.groomers.iter().filter(|g| g.id == id).collect(),
        _ => state.groomers.iter().collect(),
    };

    match state.view {
        ViewMode::Day => dates
            .iter()
            .flat_map(|date| groomers.iter().map(move |g| ((*g).clone(), date.clone())))
            .collect(),
        ViewMode::Week => groomers
            .iter()
            .flat_map(|g| dates.iter().map(move |date| ((*g).clone(), date.clone())))
            .collect(),
    }
}

pub fn calculate_layout(state: &CalendarView) -> CalendarGrid {
    let hours = state.visible_hours();
    let active_id = state.active_appointment_id();

    let columns = column_targets(state)
        .into_iter()
        .map(|(groomer, date)| {
            let rows = hours
                .iter()
                .map(|visible| build_row(state, &groomer, &date, visible, active_id))
                .collect();

            let appointment_count =
                groomer_appointment_count(&state.appointments, groomer.id, date.date);
            GridColumn {
                appointment_count,
                groomer,
                date,
                rows,
            }
        })
        .collect();

    CalendarGrid { hours, columns }
}

fn build_row(
    state: &CalendarView,
    groomer: &CalendarGroomer,
    date: &CalendarDate,
    visible: &VisibleHour,
    active_id: Option<i64>,
) -> GridRow {
    let hour = visible.hour;

    let cards = appointments_in_slot(&state.appointments, groomer.id, date.date, hour)
        .into_iter()
        .map(|appointment| {
            let position = stack_position(appointment, &state.appointments);
            CardLayout {
                appointment: appointment.clone(),
                geometry: geometry_for_position(appointment, position, active_id, &state.metrics),
                position,
                is_active: active_id == Some(appointment.id),
            }
        })
        .collect();

    let blocks = state
        .time_blocks
        .iter()
        .filter(|b| b.is_on(groomer.id, date.date) && b.start.hour() == hour)
        .map(|block| {
            let (top, height) =
                vertical_extent(block.start.minutes(), block.end.minutes(), &state.metrics);
            BlockLayout {
                block: block.clone(),
                top,
                height,
            }
        })
        .collect();

    GridRow {
        hour,
        label: visible.label.clone(),
        cards,
        blocks,
        occupied: is_slot_occupied(&state.appointments, groomer.id, date.date, hour),
        blocked: is_slot_blocked(&state.time_blocks, groomer.id, date.date, hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CalendarData, CalendarHandler, SlotSelection};
    use crate::calendar::{BlockReason, ClockTime};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    struct NoopHandler;

    impl CalendarHandler for NoopHandler {
        fn on_appointment_click(&mut self, _appointment: &Appointment) {}
        fn on_slot_click(&mut self, _slot: SlotSelection) {}
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    fn appointment(id: i64, groomer_id: i64, start: &str, end: &str) -> Appointment {
        Appointment::from_display_times(id, groomer_id, today(), start, end).unwrap()
    }

    fn state_with(appointments: Vec<Appointment>, time_blocks: Vec<TimeBlock>) -> CalendarView {
        let mut state = CalendarView::new(today());
        state.set_data(CalendarData {
            groomers: vec![
                CalendarGroomer::new(1, "Dana Whitfield"),
                CalendarGroomer::new(2, "Luis Ortega"),
            ],
            appointments,
            time_blocks,
        });
        state
    }

    #[test]
    fn day_view_has_one_column_per_groomer() {
        let grid = calculate_layout(&state_with(vec![], vec![]));

        let names: Vec<&str> = grid.columns.iter().map(|c| c.groomer.name.as_str()).collect();
        assert_eq!(names, vec!["Dana Whitfield", "Luis Ortega"]);
        assert!(grid.columns.iter().all(|c| c.rows.len() == 11));
    }

    #[test]
    fn week_view_has_seven_columns_for_focused_groomer() {
        let mut state = state_with(vec![], vec![]);
        state.set_view(ViewMode::Week);

        let grid = calculate_layout(&state);

        assert_eq!(grid.columns.len(), 7);
        assert!(grid.columns.iter().all(|c| c.groomer.id == 1));
        assert_eq!(grid.columns.iter().filter(|c| c.date.is_today).count(), 1);
    }

    #[test]
    fn cards_land_in_their_start_row() {
        let state = state_with(vec![appointment(1, 2, "10:15 AM", "12:00 PM")], vec![]);
        let grid = calculate_layout(&state);

        let column = &grid.columns[1];
        let row = column.row_for_hour(10).unwrap();
        assert_eq!(row.cards.len(), 1);
        assert_eq!(row.cards[0].geometry.top, 25.0);
        assert!(column.row_for_hour(11).unwrap().cards.is_empty());
        assert!(!column.row_for_hour(11).unwrap().accepts_slot_click());
        assert!(column.row_for_hour(12).unwrap().accepts_slot_click());
        assert_eq!(column.appointment_count, 1);
    }

    #[test]
    fn late_appointment_extends_every_column() {
        let state = state_with(vec![appointment(1, 1, "6:00 PM", "7:30 PM")], vec![]);
        let grid = calculate_layout(&state);

        assert_eq!(grid.hours.last().unwrap().hour, 21);
        assert!(grid.columns.iter().all(|c| c.rows.len() == 14));
    }

    #[test]
    fn blocks_are_placed_and_suppress_slot_clicks() {
        let block = TimeBlock {
            id: 9,
            groomer_id: 1,
            date: today(),
            start: ClockTime::from_hm(12, 30).unwrap(),
            end: ClockTime::from_hm(13, 30).unwrap(),
            reason: BlockReason::Lunch,
            description: None,
        };
        let grid = calculate_layout(&state_with(vec![], vec![block]));

        let column = &grid.columns[0];
        let noon = column.row_for_hour(12).unwrap();
        assert_eq!(noon.blocks.len(), 1);
        assert_eq!(noon.blocks[0].top, 50.0);
        assert!(!noon.accepts_slot_click());
        assert!(!column.row_for_hour(13).unwrap().accepts_slot_click());
        assert!(grid.columns[1].row_for_hour(12).unwrap().accepts_slot_click());
    }

    #[test]
    fn topmost_card_follows_stacking_and_active_card() {
        let mut state = state_with(
            vec![
                appointment(1, 1, "9:00 AM", "10:00 AM"),
                appointment(2, 1, "9:30 AM", "10:30 AM"),
            ],
            vec![],
        );

        let grid = calculate_layout(&state);
        let hit = grid.topmost_card_at(0, 9 * 60 + 45, 100.0).unwrap();
        assert_eq!(hit.appointment.id, 2);

        // Left of the second card's offset only the first card is under the pointer.
        let hit = grid.topmost_card_at(0, 9 * 60 + 45, 0.0).unwrap();
        assert_eq!(hit.appointment.id, 1);

        state.click_appointment(1, &mut NoopHandler);
        let grid = calculate_layout(&state);
        let hit = grid.topmost_card_at(0, 9 * 60 + 45, 100.0).unwrap();
        assert_eq!(hit.appointment.id, 1);
        assert!(hit.is_active);
    }

    #[test]
    fn paint_order_puts_active_card_last() {
        let mut state = state_with(
            vec![
                appointment(1, 1, "9:00 AM", "10:00 AM"),
                appointment(2, 1, "9:30 AM", "10:30 AM"),
            ],
            vec![],
        );
        state.click_appointment(1, &mut NoopHandler);

        let grid = calculate_layout(&state);
        let order: Vec<i64> = grid.paint_order(0).iter().map(|c| c.appointment.id).collect();

        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn empty_minute_has_no_card() {
        let state = state_with(vec![appointment(1, 1, "9:00 AM", "10:00 AM")], vec![]);
        let grid = calculate_layout(&state);

        assert!(grid.topmost_card_at(0, 10 * 60, 500.0).is_none());
        assert!(grid.topmost_card_at(5, 9 * 60, 500.0).is_none());
    }
}
