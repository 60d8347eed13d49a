use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::{dialogs::centered_rect, state::TuiState};

pub fn render(f: &mut Frame, state: &TuiState) {
    let help_area = centered_rect(f.size(), 56, 22);
    f.render_widget(Clear, help_area);

    let section = Style::default().fg(state.theme.column_header);
    let help_text = vec![
        Line::from(vec![Span::styled(
            "groomdesk Help",
            Style::default().fg(state.theme.title).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Navigation:", section)]),
        Line::from("  h/l      - Previous/next day (week in week view)"),
        Line::from("  j/k      - Scroll hours"),
        Line::from("  t        - Jump to today"),
        Line::from("  d/w      - Day/Week view"),
        Line::from("  Tab      - Next groomer (week view)"),
        Line::from("  r        - Reload appointments"),
        Line::from(""),
        Line::from(vec![Span::styled("Mouse:", section)]),
        Line::from("  Click a card to open it; a card hidden behind"),
        Line::from("  others comes to the front first."),
        Line::from("  Click an empty hour to book a pet into it."),
        Line::from(""),
        Line::from(vec![Span::styled("Booking:", section)]),
        Line::from("  type     - Search pets"),
        Line::from("  Up/Down  - Choose pet"),
        Line::from("  +/-      - Change duration"),
        Line::from("  Enter    - Book, Esc - Cancel"),
        Line::from(""),
        Line::from("  ?  - Toggle help    q - Quit"),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" Help (q to close) ")
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}
