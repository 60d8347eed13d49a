use chrono::NaiveDate;

use crate::calendar::date::{calendar_dates, navigate};
use crate::calendar::{
    Appointment, CalendarDate, CalendarGroomer, ClockTime, Direction, TimeBlock, ViewMode,
};
use crate::storage::config::CalendarConfig;
use crate::ui::card::{self, CardGeometry, LayoutMetrics};
use crate::ui::overlap::find_overlaps;
use crate::ui::slots::{
    appointments_in_slot, groomer_appointment_count, is_slot_blocked, is_slot_occupied,
};
use crate::ui::time_range::{visible_hours, VisibleHour};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub groomer_id: i64,
    pub date: NaiveDate,
    pub time: ClockTime,
}

/// Host hooks the calendar reports clicks through.
pub trait CalendarHandler {
    fn on_appointment_click(&mut self, appointment: &Appointment);
    fn on_slot_click(&mut self, slot: SlotSelection);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    OpenedDetail,
    BroughtToFront,
    SlotSelected,
    Ignored,
}

/// Everything one fetch hands the calendar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarData {
    pub groomers: Vec<CalendarGroomer>,
    pub appointments: Vec<Appointment>,
    pub time_blocks: Vec<TimeBlock>,
}

pub struct CalendarView {
    pub view: ViewMode,
    pub anchor_date: NaiveDate,
    pub today: NaiveDate,
    pub focused_groomer: Option<i64>,
    pub groomers: Vec<CalendarGroomer>,
    pub appointments: Vec<Appointment>,
    pub time_blocks: Vec<TimeBlock>,
    pub metrics: LayoutMetrics,
    pub default_start_hour: u32,
    pub default_end_hour: u32,
    active_appointment_id: Option<i64>,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        Self::from_config(&CalendarConfig::default(), today)
    }

    pub fn from_config(config: &CalendarConfig, today: NaiveDate) -> Self {
        Self {
            view: config.default_view,
            anchor_date: today,
            today,
            focused_groomer: None,
            groomers: Vec::new(),
            appointments: Vec::new(),
            time_blocks: Vec::new(),
            metrics: LayoutMetrics::from(config),
            default_start_hour: config.default_start_hour,
            default_end_hour: config.default_end_hour,
            active_appointment_id: None,
        }
    }

    pub fn active_appointment_id(&self) -> Option<i64> {
        self.active_appointment_id
    }

    pub fn dates(&self) -> Vec<CalendarDate> {
        calendar_dates(self.view, self.anchor_date, self.today)
    }

    pub fn visible_hours(&self) -> Vec<VisibleHour> {
        visible_hours(
            &self.appointments,
            self.default_start_hour,
            self.default_end_hour,
        )
    }

    /// Replaces the calendar contents. The active card survives only if it
    /// is still present.
    pub fn set_data(&mut self, data: CalendarData) {
        self.groomers = data.groomers;
        self.appointments = data.appointments;
        self.time_blocks = data.time_blocks;

        if let Some(active) = self.active_appointment_id
            && self.appointment(active).is_none()
        {
            self.active_appointment_id = None;
        }
        if let Some(focused) = self.focused_groomer
            && !self.groomers.iter().any(|g| g.id == focused)
        {
            self.focused_groomer = None;
        }
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.retain(|a| a.id != appointment.id);
        self.appointments.push(appointment);
    }

    pub fn appointment(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn groomer(&self, id: i64) -> Option<&CalendarGroomer> {
        self.groomers.iter().find(|g| g.id == id)
    }

    pub fn groomer_appointment_count(&self, groomer_id: i64, date: NaiveDate) -> usize {
        groomer_appointment_count(&self.appointments, groomer_id, date)
    }

    pub fn card_geometry(&self, appointment_id: i64) -> Option<CardGeometry> {
        let appointment = self.appointment(appointment_id)?;
        Some(card::card_geometry(
            appointment,
            &self.appointments,
            self.active_appointment_id,
            &self.metrics,
        ))
    }

    /// Lone cards and front cards open their detail view; a card hidden
    /// behind others is only brought forward.
    pub fn click_appointment(
        &mut self,
        appointment_id: i64,
        handler: &mut impl CalendarHandler,
    ) -> ClickOutcome {
        let Some(appointment) = self.appointment(appointment_id) else {
            tracing::warn!("Click on unknown appointment {}", appointment_id);
            return ClickOutcome::Ignored;
        };

        if find_overlaps(appointment, &self.appointments).is_empty() {
            handler.on_appointment_click(appointment);
            return ClickOutcome::OpenedDetail;
        }

        if card::is_front(
            appointment,
            &self.appointments,
            self.active_appointment_id,
            &self.metrics,
        ) {
            handler.on_appointment_click(appointment);
            return ClickOutcome::OpenedDetail;
        }

        tracing::debug!("Bringing appointment {} to front", appointment_id);
        self.active_appointment_id = Some(appointment_id);
        ClickOutcome::BroughtToFront
    }

    /// Empty, unblocked slots report a booking target; anything else is
    /// swallowed.
    pub fn click_slot(
        &mut self,
        groomer_id: i64,
        date: NaiveDate,
        hour: u32,
        handler: &mut impl CalendarHandler,
    ) -> ClickOutcome {
        let Ok(time) = ClockTime::from_hm(hour, 0) else {
            return ClickOutcome::Ignored;
        };

        let has_cards =
            !appointments_in_slot(&self.appointments, groomer_id, date, hour).is_empty();
        if has_cards
            || is_slot_occupied(&self.appointments, groomer_id, date, hour)
            || is_slot_blocked(&self.time_blocks, groomer_id, date, hour)
        {
            return ClickOutcome::Ignored;
        }

        handler.on_slot_click(SlotSelection {
            groomer_id,
            date,
            time,
        });
        ClickOutcome::SlotSelected
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view == ViewMode::Day && view == ViewMode::Week && self.focused_groomer.is_none() {
            self.focused_groomer = self.groomers.first().map(|g| g.id);
        }
        self.view = view;
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.anchor_date = navigate(self.view, self.anchor_date, direction);
    }

    pub fn go_to_today(&mut self) {
        self.anchor_date = self.today;
    }

    /// Steps the week view's groomer through the roster.
    pub fn cycle_focused_groomer(&mut self) {
        if self.groomers.is_empty() {
            self.focused_groomer = None;
            return;
        }
        let next = match self.focused_groomer {
            Some(current) => self
                .groomers
                .iter()
                .position(|g| g.id == current)
                .map(|i| (i + 1) % self.groomers.len())
                .unwrap_or(0),
            None => 0,
        };
        self.focused_groomer = Some(self.groomers[next].id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::BlockReason;

    #[derive(Default)]
    struct RecordingHandler {
        opened: Vec<i64>,
        slots: Vec<SlotSelection>,
    }

    impl CalendarHandler for RecordingHandler {
        fn on_appointment_click(&mut self, appointment: &Appointment) {
            self.opened.push(appointment.id);
        }

        fn on_slot_click(&mut self, slot: SlotSelection) {
            self.slots.push(slot);
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn appointment(id: i64, groomer_id: i64, start: &str, end: &str) -> Appointment {
        Appointment::from_display_times(id, groomer_id, today(), start, end).unwrap()
    }

    fn view_with(appointments: Vec<Appointment>) -> CalendarView {
        let mut view = CalendarView::new(today());
        view.set_data(CalendarData {
            groomers: vec![
                CalendarGroomer::new(1, "Dana Whitfield"),
                CalendarGroomer::new(2, "Luis Ortega"),
            ],
            appointments,
            time_blocks: vec![],
        });
        view
    }

    #[test]
    fn new_view_starts_on_today_in_day_mode() {
        let view = CalendarView::new(today());

        assert_eq!(view.anchor_date, today());
        assert_eq!(view.view, ViewMode::Day);
        assert_eq!(view.active_appointment_id(), None);
    }

    #[test]
    fn lone_card_opens_detail_immediately() {
        let mut view = view_with(vec![appointment(1, 1, "9:00 AM", "10:00 AM")]);
        let mut handler = RecordingHandler::default();

        let outcome = view.click_appointment(1, &mut handler);

        assert_eq!(outcome, ClickOutcome::OpenedDetail);
        assert_eq!(handler.opened, vec![1]);
    }

    #[test]
    fn back_card_is_revealed_then_opened() {
        let mut view = view_with(vec![
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 1, "9:30 AM", "10:30 AM"),
        ]);
        let mut handler = RecordingHandler::default();

        let first = view.click_appointment(1, &mut handler);
        assert_eq!(first, ClickOutcome::BroughtToFront);
        assert_eq!(view.active_appointment_id(), Some(1));
        assert!(handler.opened.is_empty());

        let second = view.click_appointment(1, &mut handler);
        assert_eq!(second, ClickOutcome::OpenedDetail);
        assert_eq!(handler.opened, vec![1]);
    }

    #[test]
    fn front_card_opens_on_first_click() {
        let mut view = view_with(vec![
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 1, "9:30 AM", "10:30 AM"),
        ]);
        let mut handler = RecordingHandler::default();

        assert_eq!(view.click_appointment(2, &mut handler), ClickOutcome::OpenedDetail);
        assert_eq!(handler.opened, vec![2]);
    }

    #[test]
    fn bringing_another_card_forward_replaces_active() {
        let mut view = view_with(vec![
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 1, "9:30 AM", "10:30 AM"),
        ]);
        let mut handler = RecordingHandler::default();

        view.click_appointment(1, &mut handler);
        assert_eq!(view.click_appointment(2, &mut handler), ClickOutcome::BroughtToFront);
        assert_eq!(view.active_appointment_id(), Some(2));
        assert!(handler.opened.is_empty());
    }

    #[test]
    fn active_card_geometry_reflects_front() {
        let mut view = view_with(vec![
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 1, "9:30 AM", "10:30 AM"),
        ]);
        let mut handler = RecordingHandler::default();
        view.click_appointment(1, &mut handler);

        let first = view.card_geometry(1).unwrap();
        let second = view.card_geometry(2).unwrap();
        assert!(first.z_index > second.z_index);
    }

    #[test]
    fn unknown_appointment_click_is_ignored() {
        let mut view = view_with(vec![]);
        let mut handler = RecordingHandler::default();

        assert_eq!(view.click_appointment(42, &mut handler), ClickOutcome::Ignored);
    }

    #[test]
    fn empty_slot_click_reports_groomer_date_and_time() {
        let mut view = view_with(vec![]);
        let mut handler = RecordingHandler::default();

        let outcome = view.click_slot(2, today(), 14, &mut handler);

        assert_eq!(outcome, ClickOutcome::SlotSelected);
        assert_eq!(
            handler.slots,
            vec![SlotSelection {
                groomer_id: 2,
                date: today(),
                time: ClockTime::from_hm(14, 0).unwrap(),
            }]
        );
    }

    #[test]
    fn slot_under_multi_hour_tail_is_ignored() {
        let mut view = view_with(vec![appointment(1, 1, "9:00 AM", "11:00 AM")]);
        let mut handler = RecordingHandler::default();

        assert_eq!(view.click_slot(1, today(), 10, &mut handler), ClickOutcome::Ignored);
        assert_eq!(view.click_slot(1, today(), 11, &mut handler), ClickOutcome::SlotSelected);
    }

    #[test]
    fn blocked_slot_click_is_ignored() {
        let mut view = view_with(vec![]);
        view.time_blocks.push(TimeBlock {
            id: 1,
            groomer_id: 1,
            date: today(),
            start: ClockTime::from_hm(12, 0).unwrap(),
            end: ClockTime::from_hm(13, 0).unwrap(),
            reason: BlockReason::Lunch,
            description: None,
        });
        let mut handler = RecordingHandler::default();

        assert_eq!(view.click_slot(1, today(), 12, &mut handler), ClickOutcome::Ignored);
        assert!(handler.slots.is_empty());
    }

    #[test]
    fn replacing_data_drops_missing_active_card() {
        let mut view = view_with(vec![
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 1, "9:30 AM", "10:30 AM"),
        ]);
        let mut handler = RecordingHandler::default();
        view.click_appointment(1, &mut handler);
        let groomers = view.groomers.clone();

        view.set_data(CalendarData {
            groomers,
            appointments: vec![appointment(2, 1, "9:30 AM", "10:30 AM")],
            time_blocks: vec![],
        });

        assert_eq!(view.active_appointment_id(), None);
    }

    #[test]
    fn groomer_count_matches_appointments() {
        let view = view_with(vec![
            appointment(3, 1, "1:00 PM", "2:00 PM"),
            appointment(1, 1, "9:00 AM", "10:00 AM"),
            appointment(2, 2, "9:00 AM", "10:00 AM"),
            appointment(4, 1, "11:00 AM", "12:00 PM"),
        ]);

        assert_eq!(view.groomer_appointment_count(1, today()), 3);
    }

    #[test]
    fn switching_to_week_focuses_first_groomer() {
        let mut view = view_with(vec![]);
        view.set_view(ViewMode::Week);

        assert_eq!(view.focused_groomer, Some(1));
        assert_eq!(view.dates().len(), 7);

        view.cycle_focused_groomer();
        assert_eq!(view.focused_groomer, Some(2));
        view.cycle_focused_groomer();
        assert_eq!(view.focused_groomer, Some(1));
    }

    #[test]
    fn navigation_moves_anchor() {
        let mut view = view_with(vec![]);
        view.navigate(Direction::Next);
        assert_eq!(view.anchor_date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        view.go_to_today();
        assert_eq!(view.anchor_date, today());
    }
}
