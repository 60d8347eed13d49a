use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::tui::{dialogs::centered_rect, state::TuiState};

pub fn render(f: &mut Frame, state: &TuiState) {
    let Some(appointment) = &state.overlay.detail else {
        return;
    };

    let dialog_area = centered_rect(f.size(), 60, 14);
    f.render_widget(Clear, dialog_area);

    let label = Style::default().fg(Color::DarkGray);
    let status = appointment.status.map(|s| s.label()).unwrap_or("Scheduled");

    let mut lines = vec![
        Line::from(vec![Span::styled(
            appointment.pet_name.clone(),
            Style::default().fg(state.theme.title).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("When:    ", label),
            Span::raw(format!(
                "{} {}-{} ({} min)",
                appointment.date.format("%a %b %-d"),
                appointment.start,
                appointment.end,
                appointment.duration_minutes()
            )),
        ]),
        Line::from(vec![Span::styled("Owner:   ", label), Span::raw(appointment.owner.clone())]),
        Line::from(vec![Span::styled("Service: ", label), Span::raw(appointment.service.clone())]),
        Line::from(vec![Span::styled("Groomer: ", label), Span::raw(appointment.groomer.clone())]),
        Line::from(vec![
            Span::styled("Status:  ", label),
            Span::styled(status, Style::default().fg(state.theme.status_color(appointment.status))),
        ]),
    ];

    if !appointment.tags.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Tags:    ", label),
            Span::raw(appointment.tags.join(", ")),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!(" Appointment #{} (Esc to close) ", appointment.id))
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, dialog_area);
}
