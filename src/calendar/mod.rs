pub mod appointment;
pub mod date;
pub mod groomer;
pub mod time;

pub use appointment::{Appointment, AppointmentError, AppointmentStatus, BlockReason, TimeBlock};
pub use date::{CalendarDate, Direction, ViewMode};
pub use groomer::CalendarGroomer;
pub use time::{ClockTime, TimeError};
