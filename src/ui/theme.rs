use ratatui::style::Color;

use crate::calendar::AppointmentStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub column_header: Color,
    pub today: Color,
    pub hour_label: Color,
    pub grid_line: Color,
    pub card: Color,
    pub card_active: Color,
    pub block: Color,
    pub scheduled: Color,
    pub confirmed: Color,
    pub in_progress: Color,
    pub finished: Color,
    pub cancelled: Color,
    pub status_bar: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            column_header: Color::Yellow,
            today: Color::Green,
            hour_label: Color::DarkGray,
            grid_line: Color::DarkGray,
            card: Color::White,
            card_active: Color::LightCyan,
            block: Color::DarkGray,
            scheduled: Color::Blue,
            confirmed: Color::Green,
            in_progress: Color::Magenta,
            finished: Color::Gray,
            cancelled: Color::Red,
            status_bar: Color::White,
            error: Color::Red,
            success: Color::Green,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            title: Color::Rgb(251, 184, 108),
            column_header: Color::Rgb(254, 128, 25),
            today: Color::Rgb(184, 187, 38),
            hour_label: Color::Rgb(146, 131, 116),
            grid_line: Color::Rgb(80, 73, 69),
            card: Color::Rgb(235, 219, 178),
            card_active: Color::Rgb(250, 189, 47),
            block: Color::Rgb(102, 92, 84),
            scheduled: Color::Rgb(131, 165, 152),
            confirmed: Color::Rgb(184, 187, 38),
            in_progress: Color::Rgb(211, 134, 155),
            finished: Color::Rgb(146, 131, 116),
            cancelled: Color::Rgb(251, 73, 52),
            status_bar: Color::Rgb(235, 219, 178),
            error: Color::Rgb(251, 73, 52),
            success: Color::Rgb(184, 187, 38),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            title: Color::Rgb(136, 192, 208),
            column_header: Color::Rgb(235, 203, 139),
            today: Color::Rgb(163, 190, 140),
            hour_label: Color::Rgb(76, 86, 106),
            grid_line: Color::Rgb(59, 66, 82),
            card: Color::Rgb(216, 222, 233),
            card_active: Color::Rgb(143, 188, 187),
            block: Color::Rgb(67, 76, 94),
            scheduled: Color::Rgb(129, 161, 193),
            confirmed: Color::Rgb(163, 190, 140),
            in_progress: Color::Rgb(180, 142, 173),
            finished: Color::Rgb(76, 86, 106),
            cancelled: Color::Rgb(191, 97, 106),
            status_bar: Color::Rgb(216, 222, 233),
            error: Color::Rgb(191, 97, 106),
            success: Color::Rgb(163, 190, 140),
        }
    }

    pub fn status_color(&self, status: Option<AppointmentStatus>) -> Color {
        match status {
            Some(AppointmentStatus::Scheduled) | None => self.scheduled,
            Some(AppointmentStatus::Confirmed) => self.confirmed,
            Some(AppointmentStatus::InProgress) => self.in_progress,
            Some(AppointmentStatus::Completed) => self.finished,
            Some(AppointmentStatus::Cancelled) | Some(AppointmentStatus::NoShow) => self.cancelled,
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default_theme(),
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "gruvbox", "nord"]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
