use std::ops::Range;

use groomdesk::{
    app::{CalendarHandler, CalendarView, SlotSelection},
    calendar::Appointment,
    sync::api::{MAX_BOOKING_MINUTES, MIN_BOOKING_MINUTES, PetSearchResult},
    ui::theme::Theme,
};

pub const DEFAULT_BOOKING_MINUTES: u32 = 60;
const DURATION_STEP_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum StatusLine {
    Idle,
    Loading,
    Info(String),
    Error(String),
}

/// A booking being put together for an empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub slot: SlotSelection,
    pub groomer_name: String,
    pub query: String,
    pub results: Vec<PetSearchResult>,
    pub selected: usize,
    pub duration_minutes: u32,
}

impl BookingDraft {
    pub fn new(slot: SlotSelection) -> Self {
        Self {
            slot,
            groomer_name: String::new(),
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            duration_minutes: DEFAULT_BOOKING_MINUTES,
        }
    }

    pub fn selected_pet(&self) -> Option<&PetSearchResult> {
        self.results.get(self.selected)
    }

    pub fn set_results(&mut self, results: Vec<PetSearchResult>) {
        self.results = results;
        self.selected = 0;
    }

    /// Indices of the at most `shown` results to list, keeping the selection
    /// in view.
    pub fn visible_results(&self, shown: usize) -> Range<usize> {
        let start = (self.selected + 1).saturating_sub(shown);
        start..(start + shown).min(self.results.len())
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.results.len() - 1);
        }
    }

    pub fn lengthen(&mut self) {
        self.duration_minutes =
            (self.duration_minutes + DURATION_STEP_MINUTES).min(MAX_BOOKING_MINUTES);
    }

    pub fn shorten(&mut self) {
        self.duration_minutes = self
            .duration_minutes
            .saturating_sub(DURATION_STEP_MINUTES)
            .max(MIN_BOOKING_MINUTES);
    }
}

/// Popups opened by calendar clicks.
#[derive(Debug, Default)]
pub struct Overlay {
    pub detail: Option<Appointment>,
    pub booking: Option<BookingDraft>,
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        self.detail.is_some() || self.booking.is_some()
    }

    pub fn close(&mut self) {
        self.detail = None;
        self.booking = None;
    }
}

impl CalendarHandler for Overlay {
    fn on_appointment_click(&mut self, appointment: &Appointment) {
        tracing::debug!("Opening detail for appointment {}", appointment.id);
        self.booking = None;
        self.detail = Some(appointment.clone());
    }

    fn on_slot_click(&mut self, slot: SlotSelection) {
        tracing::debug!(
            "Starting booking for groomer {} on {} at {}",
            slot.groomer_id,
            slot.date,
            slot.time
        );
        self.detail = None;
        self.booking = Some(BookingDraft::new(slot));
    }
}

pub struct TuiState {
    pub view: CalendarView,
    pub overlay: Overlay,
    pub theme: Theme,
    pub status: StatusLine,
    pub scroll_rows: u16,
    pub show_help: bool,
    pub sample: bool,
}

impl TuiState {
    pub fn new(view: CalendarView, theme: Theme, sample: bool) -> Self {
        Self {
            view,
            overlay: Overlay::default(),
            theme,
            status: StatusLine::Idle,
            scroll_rows: 0,
            show_help: false,
            sample,
        }
    }

    /// Fills in what the booking popup shows about the slot's groomer.
    pub fn label_booking(&mut self) {
        if let Some(draft) = self.overlay.booking.as_mut()
            && draft.groomer_name.is_empty()
        {
            draft.groomer_name = self
                .view
                .groomer(draft.slot.groomer_id)
                .map(|g| g.name.clone())
                .unwrap_or_default();
        }
    }
}
