pub mod card;
pub mod grid;
pub mod overlap;
pub mod slots;
pub mod theme;
pub mod time_range;
