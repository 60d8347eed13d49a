use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::{dialogs::centered_rect, state::TuiState};

const MAX_RESULTS_SHOWN: usize = 8;

pub fn render(f: &mut Frame, state: &TuiState) {
    let Some(draft) = &state.overlay.booking else {
        return;
    };

    let dialog_area = centered_rect(f.size(), 64, 18);
    f.render_widget(Clear, dialog_area);

    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![Span::styled(
            "New Appointment",
            Style::default().fg(state.theme.title).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Slot:     ", label),
            Span::raw(format!(
                "{} {} with {}",
                draft.slot.date.format("%a %b %-d"),
                draft.slot.time,
                draft.groomer_name
            )),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", label),
            Span::raw(format!("{} min", draft.duration_minutes)),
            Span::styled("  (+/-)", label),
        ]),
        Line::from(vec![
            Span::styled("Pet:      ", label),
            Span::raw(draft.query.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
    ];

    if draft.results.is_empty() {
        lines.push(Line::from(Span::styled("  No matching pets", label)));
    }

    let window = draft.visible_results(MAX_RESULTS_SHOWN);
    for (index, pet) in draft.results.iter().enumerate().take(window.end).skip(window.start) {
        let breed = pet.breed.as_deref().unwrap_or(&pet.species);
        let text = format!("  {} ({}) - {}", pet.pet_name, pet.family_name, breed);
        let style = if index == draft.selected {
            Style::default().fg(Color::Black).bg(state.theme.card_active)
        } else {
            Style::default().fg(state.theme.card)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" Book (Enter to confirm, Esc to cancel) ")
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(paragraph, dialog_area);
}
