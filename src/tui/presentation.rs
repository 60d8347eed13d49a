use groomdesk::{calendar::ViewMode, ui::grid::CalendarGrid};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::{
    dialogs,
    grid_view::{self, ScreenGrid},
    state::{StatusLine, TuiState},
};

/// Where the grid body goes for a terminal of the given size.
pub fn grid_area(size: Rect) -> Rect {
    let chunks = main_chunks(size);
    Block::default().borders(Borders::ALL).inner(chunks[1])
}

fn main_chunks(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(size)
}

pub fn ui(f: &mut Frame, state: &TuiState, grid: &CalendarGrid) {
    let chunks = main_chunks(f.size());

    let title_text = match state.view.view {
        ViewMode::Day => format!(
            "groomdesk - Day - {}",
            state.view.anchor_date.format("%A, %B %-d, %Y")
        ),
        ViewMode::Week => {
            let groomer = state
                .view
                .focused_groomer
                .and_then(|id| state.view.groomer(id))
                .map(|g| g.name.as_str())
                .unwrap_or("All groomers");
            let range = match (grid.columns.first(), grid.columns.last()) {
                (Some(first), Some(last)) => format!("{} - {}", first.date.label, last.date.label),
                _ => String::new(),
            };
            format!("groomdesk - Week - {} - {}", groomer, range)
        }
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(state.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    f.render_widget(Block::default().borders(Borders::ALL), chunks[1]);
    let screen = ScreenGrid::new(grid_area(f.size()), grid.columns.len(), state.scroll_rows);
    grid_view::render(f, state, grid, &screen);

    let appointments = grid
        .columns
        .iter()
        .map(|c| c.appointment_count)
        .sum::<usize>();
    let (status_text, status_color) = match &state.status {
        StatusLine::Idle => (
            format!("Appointments: {} | Press '?' for help, 'q' to quit", appointments),
            state.theme.status_bar,
        ),
        StatusLine::Loading => ("Loading appointments...".to_string(), state.theme.status_bar),
        StatusLine::Info(message) => (message.clone(), state.theme.success),
        StatusLine::Error(message) => (message.clone(), state.theme.error),
    };
    let status_text = if state.sample {
        format!("[sample] {}", status_text)
    } else {
        status_text
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    if state.show_help {
        dialogs::help::render(f, state);
    }

    if state.overlay.booking.is_some() {
        dialogs::booking::render(f, state);
    }

    if state.overlay.detail.is_some() {
        dialogs::detail::render(f, state);
    }
}
