use groomdesk::{
    calendar::{CalendarGroomer, ViewMode},
    ui::{
        card::LayoutMetrics,
        grid::{CalendarGrid, CardLayout, GridColumn},
    },
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::tui::state::TuiState;

pub const ROWS_PER_HOUR: u16 = 4;
const MINUTES_PER_ROW: u32 = 60 / ROWS_PER_HOUR as u32;
const GUTTER_WIDTH: u16 = 9;
const HEADER_ROWS: u16 = 2;
const STACK_INDENT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Card(i64),
    Slot { column: usize, hour: u32 },
}

/// Maps the pixel layout of a calendar grid onto terminal cells: each hour
/// is `ROWS_PER_HOUR` rows, each stacking step `STACK_INDENT` columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGrid {
    pub area: Rect,
    pub column_width: u16,
    pub scroll_rows: u16,
}

impl ScreenGrid {
    pub fn new(area: Rect, columns: usize, scroll_rows: u16) -> Self {
        let columns = u16::try_from(columns.max(1)).unwrap_or(u16::MAX);
        Self {
            area,
            column_width: area.width.saturating_sub(GUTTER_WIDTH) / columns,
            scroll_rows,
        }
    }

    pub fn body_top(&self) -> u16 {
        self.area.y + HEADER_ROWS.min(self.area.height)
    }

    pub fn body_height(&self) -> u16 {
        self.area.height.saturating_sub(HEADER_ROWS)
    }

    pub fn max_scroll(&self, hours: usize) -> u16 {
        let total = u16::try_from(hours).unwrap_or(u16::MAX).saturating_mul(ROWS_PER_HOUR);
        total.saturating_sub(self.body_height())
    }

    fn column_x(&self, index: usize) -> u16 {
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        self.area.x + GUTTER_WIDTH + index.saturating_mul(self.column_width)
    }

    /// Screen rect for body rows `[start, end)`, clipped to the visible body.
    fn body_rect(&self, x: u16, width: u16, start: u16, end: u16) -> Option<Rect> {
        let visible_start = start.max(self.scroll_rows);
        let visible_end = end.min(self.scroll_rows.saturating_add(self.body_height()));
        if visible_start >= visible_end || width == 0 {
            return None;
        }
        Some(Rect::new(
            x,
            self.body_top() + (visible_start - self.scroll_rows),
            width,
            visible_end - visible_start,
        ))
    }

    pub fn hit_test(
        &self,
        grid: &CalendarGrid,
        metrics: &LayoutMetrics,
        x: u16,
        y: u16,
    ) -> Option<Hit> {
        let first_column_x = self.area.x + GUTTER_WIDTH;
        if self.column_width == 0
            || x < first_column_x
            || y < self.body_top()
            || y >= self.area.y + self.area.height
        {
            return None;
        }

        let column = usize::from((x - first_column_x) / self.column_width);
        if column >= grid.columns.len() {
            return None;
        }

        let body_row = y - self.body_top() + self.scroll_rows;
        let hour = grid.hours.get(usize::from(body_row / ROWS_PER_HOUR))?.hour;
        let row_start = hour * 60 + u32::from(body_row % ROWS_PER_HOUR) * MINUTES_PER_ROW;

        let offset_cells = x - self.column_x(column);
        let left_px = f32::from(offset_cells) / f32::from(STACK_INDENT) * metrics.stack_offset_px;

        let card = (row_start..row_start + MINUTES_PER_ROW)
            .filter_map(|minute| grid.topmost_card_at(column, minute, left_px))
            .max_by_key(|card| card.paint_key());

        Some(match card {
            Some(card) => Hit::Card(card.appointment.id),
            None => Hit::Slot { column, hour },
        })
    }
}

fn first_minute(grid: &CalendarGrid) -> u32 {
    grid.hours.first().map(|h| h.hour * 60).unwrap_or(0)
}

fn to_row(minutes_from_top: u32, round_up: bool) -> u16 {
    let rows = if round_up {
        minutes_from_top.div_ceil(MINUTES_PER_ROW)
    } else {
        minutes_from_top / MINUTES_PER_ROW
    };
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn card_rows(grid: &CalendarGrid, card: &CardLayout, metrics: &LayoutMetrics) -> (u16, u16) {
    let hour_index = grid
        .hours
        .iter()
        .position(|h| h.hour == card.appointment.start.hour())
        .unwrap_or(0);
    let offset =
        (card.geometry.top / metrics.hour_height_px * f32::from(ROWS_PER_HOUR)).floor() as u16;
    let start = u16::try_from(hour_index).unwrap_or(u16::MAX) * ROWS_PER_HOUR + offset;
    let end = to_row(card.appointment.end_minutes().saturating_sub(first_minute(grid)), true);
    (start, end.max(start + 1))
}

fn left_cells(card: &CardLayout, metrics: &LayoutMetrics) -> u16 {
    if metrics.stack_offset_px <= 0.0 {
        return 0;
    }
    (card.geometry.left / metrics.stack_offset_px).round() as u16 * STACK_INDENT
}

pub fn render(f: &mut Frame, state: &TuiState, grid: &CalendarGrid, screen: &ScreenGrid) {
    let theme = &state.theme;
    let metrics = &state.view.metrics;

    for (index, column) in grid.columns.iter().enumerate() {
        render_header(f, state, screen, index, column);
    }

    for (index, hour) in grid.hours.iter().enumerate() {
        let row = u16::try_from(index).unwrap_or(u16::MAX) * ROWS_PER_HOUR;
        if let Some(rect) = screen.body_rect(screen.area.x, GUTTER_WIDTH, row, row + 1) {
            f.render_widget(
                Paragraph::new(hour.label.clone()).style(Style::default().fg(theme.hour_label)),
                rect,
            );
        }
        for column in 0..grid.columns.len() {
            let x = screen.column_x(column);
            if let Some(rect) = screen.body_rect(x, screen.column_width, row, row + 1) {
                let rule = "┈".repeat(usize::from(screen.column_width.saturating_sub(1)));
                f.render_widget(
                    Paragraph::new(rule).style(Style::default().fg(theme.grid_line)),
                    rect,
                );
            }
        }
    }

    let top = first_minute(grid);
    for (index, column) in grid.columns.iter().enumerate() {
        let x = screen.column_x(index);
        let width = screen.column_width.saturating_sub(1);

        for layout in column.blocks() {
            let start = to_row(layout.block.start.minutes().saturating_sub(top), false);
            let end = to_row(layout.block.end.minutes().saturating_sub(top), true);
            if let Some(rect) = screen.body_rect(x, width, start, end) {
                f.render_widget(Clear, rect);
                f.render_widget(
                    Paragraph::new(format!("░ {}", layout.block.label()))
                        .style(Style::default().fg(theme.block).add_modifier(Modifier::DIM)),
                    rect,
                );
            }
        }

        for card in grid.paint_order(index) {
            let (start, end) = card_rows(grid, card, metrics);
            let indent = left_cells(card, metrics).min(width.saturating_sub(1));
            let Some(rect) = screen.body_rect(x + indent, width - indent, start, end) else {
                continue;
            };
            render_card(f, state, card, rect);
        }
    }
}

fn render_header(
    f: &mut Frame,
    state: &TuiState,
    screen: &ScreenGrid,
    index: usize,
    column: &GridColumn,
) {
    let theme = &state.theme;
    let width = screen.column_width.saturating_sub(1);
    if width == 0 || screen.area.height < HEADER_ROWS {
        return;
    }

    let (title, subtitle) = match state.view.view {
        ViewMode::Day => (
            header_name(&column.groomer, usize::from(width)).to_string(),
            format!("{} appts", column.appointment_count),
        ),
        ViewMode::Week => (
            column.date.label.clone(),
            format!("{} appts", column.appointment_count),
        ),
    };

    let title_color = if column.date.is_today && state.view.view == ViewMode::Week {
        theme.today
    } else {
        theme.column_header
    };

    let lines = vec![
        Line::from(Span::styled(
            truncate(&title, usize::from(width)),
            Style::default().fg(title_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(theme.hour_label))),
    ];
    f.render_widget(
        Paragraph::new(lines),
        Rect::new(screen.column_x(index), screen.area.y, width, HEADER_ROWS),
    );
}

/// Falls back to the first name when the full name does not fit.
fn header_name(groomer: &CalendarGroomer, width: usize) -> &str {
    if groomer.name.chars().count() <= width {
        &groomer.name
    } else {
        groomer.short_name()
    }
}

fn render_card(f: &mut Frame, state: &TuiState, card: &CardLayout, rect: Rect) {
    let theme = &state.theme;
    let appointment = &card.appointment;
    let width = usize::from(rect.width);

    let mut style = Style::default()
        .fg(Color::Black)
        .bg(theme.status_color(appointment.status));
    if card.is_active {
        style = style.bg(theme.card_active).add_modifier(Modifier::BOLD);
    }

    let mut lines = vec![Line::from(truncate(
        &format!("{} {}", appointment.start, appointment.pet_name),
        width,
    ))];
    if !appointment.service.is_empty() {
        lines.push(Line::from(truncate(&appointment.service, width)));
    }
    if !appointment.owner.is_empty() {
        lines.push(Line::from(truncate(&appointment.owner, width)));
    }

    f.render_widget(Clear, rect);
    f.render_widget(Paragraph::new(lines).style(style), rect);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width && width > 0 {
        let mut truncated: String = text.chars().take(width - 1).collect();
        truncated.push('…');
        truncated
    } else {
        text.to_string()
    }
}
