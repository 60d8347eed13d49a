pub mod calendar;
pub mod ui;
pub mod sync;
pub mod storage;
pub mod app;

pub use calendar::{Appointment, CalendarGroomer, ClockTime, TimeBlock, ViewMode};
pub use app::{CalendarData, CalendarHandler, CalendarView, ClickOutcome, SlotSelection};

pub use ui::grid::calculate_layout;
