use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use groomdesk::{
    app::{CalendarView, ClickOutcome},
    calculate_layout,
    calendar::{Appointment, ClockTime, Direction, ViewMode},
    storage::config::Config,
    sync::{
        api::{BookingRequest, GroomingApiClient, PetSearchResult},
        loader::CalendarLoader,
        search::PetSearch,
    },
    ui::{grid::CalendarGrid, theme::Theme},
};

use crate::tui::{
    grid_view::{Hit, ROWS_PER_HOUR, ScreenGrid},
    presentation::{grid_area, ui},
    sample::{sample_data, search_sample_pets},
    state::{StatusLine, TuiState},
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum Backend {
    Remote {
        loader: CalendarLoader<GroomingApiClient>,
        search: PetSearch<GroomingApiClient>,
    },
    Sample {
        min_query_len: usize,
    },
}

enum SearchUpdate {
    Results {
        query: String,
        results: Vec<PetSearchResult>,
    },
    Failed(String),
}

enum Action {
    None,
    Quit,
    Reload,
    Search,
    Submit,
}

pub async fn run_tui(sample: bool, view: Option<ViewMode>) -> anyhow::Result<()> {
    let config = Config::load_or_create().context("loading config")?;

    let backend = if sample {
        Backend::Sample {
            min_query_len: config.search.min_query_len,
        }
    } else {
        let api = Arc::new(GroomingApiClient::from_config(&config.api)?);
        Backend::Remote {
            loader: CalendarLoader::new(Arc::clone(&api)),
            search: PetSearch::new(api, &config.search),
        }
    };

    let today = Local::now().date_naive();
    let mut calendar = CalendarView::from_config(&config.calendar, today);
    if let Some(view) = view {
        calendar.set_view(view);
    }
    let mut state = TuiState::new(calendar, Theme::get_by_name(&config.ui.theme), sample);
    if sample {
        state.view.set_data(sample_data(today));
        focus_week(&mut state.view);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let res = run_app(&mut terminal, &mut state, &backend).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    backend: &Backend,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SearchUpdate>();

    reload(terminal, state, backend).await?;

    loop {
        while let Ok(update) = rx.try_recv() {
            apply_search_update(state, update);
        }

        let grid = calculate_layout(&state.view);
        let area = grid_area(terminal.size()?);
        let screen = ScreenGrid::new(area, grid.columns.len(), state.scroll_rows);
        state.scroll_rows = state.scroll_rows.min(screen.max_scroll(grid.hours.len()));
        let screen = ScreenGrid { scroll_rows: state.scroll_rows, ..screen };

        terminal.draw(|f| ui(f, state, &grid))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let action = match event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(key.code, state),
            TermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    handle_click(state, &grid, &screen, mouse.column, mouse.row);
                    Action::None
                }
                MouseEventKind::ScrollDown => {
                    state.scroll_rows = state.scroll_rows.saturating_add(1);
                    Action::None
                }
                MouseEventKind::ScrollUp => {
                    state.scroll_rows = state.scroll_rows.saturating_sub(1);
                    Action::None
                }
                _ => Action::None,
            },
            _ => Action::None,
        };

        match action {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Reload => reload(terminal, state, backend).await?,
            Action::Search => dispatch_search(state, backend, &tx),
            Action::Submit => {
                if submit_booking(state, backend).await {
                    reload(terminal, state, backend).await?;
                }
            }
        }
    }
}

/// Week view opens on a single groomer.
fn focus_week(view: &mut CalendarView) {
    if view.view == ViewMode::Week && view.focused_groomer.is_none() {
        view.cycle_focused_groomer();
    }
}

async fn reload<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    backend: &Backend,
) -> anyhow::Result<()> {
    let Backend::Remote { loader, .. } = backend else {
        return Ok(());
    };

    state.status = StatusLine::Loading;
    let grid = calculate_layout(&state.view);
    terminal.draw(|f| ui(f, state, &grid))?;

    match loader.load(state.view.view, state.view.anchor_date).await {
        Ok(data) => {
            state.view.set_data(data);
            focus_week(&mut state.view);
            state.status = StatusLine::Idle;
        }
        Err(e) => {
            tracing::error!("Failed to load appointments: {}", e);
            state.status = StatusLine::Error(format!("Load failed: {}", e));
        }
    }
    Ok(())
}

fn handle_click(state: &mut TuiState, grid: &CalendarGrid, screen: &ScreenGrid, x: u16, y: u16) {
    if state.show_help || state.overlay.is_open() {
        return;
    }

    let outcome = match screen.hit_test(grid, &state.view.metrics, x, y) {
        Some(Hit::Card(id)) => state.view.click_appointment(id, &mut state.overlay),
        Some(Hit::Slot { column, hour }) => {
            let Some(column) = grid.columns.get(column) else { return };
            state
                .view
                .click_slot(column.groomer.id, column.date.date, hour, &mut state.overlay)
        }
        None => ClickOutcome::Ignored,
    };

    if outcome == ClickOutcome::SlotSelected {
        state.label_booking();
    }
}

fn handle_key(code: KeyCode, state: &mut TuiState) -> Action {
    if state.show_help {
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc) {
            state.show_help = false;
        }
        return Action::None;
    }

    if state.overlay.detail.is_some() {
        if matches!(code, KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc) {
            state.overlay.close();
        }
        return Action::None;
    }

    if state.overlay.booking.is_some() && code == KeyCode::Esc {
        state.overlay.close();
        return Action::None;
    }

    if let Some(draft) = state.overlay.booking.as_mut() {
        return match code {
            KeyCode::Enter => Action::Submit,
            KeyCode::Up => {
                draft.select_previous();
                Action::None
            }
            KeyCode::Down => {
                draft.select_next();
                Action::None
            }
            KeyCode::Char('+') => {
                draft.lengthen();
                Action::None
            }
            KeyCode::Char('-') => {
                draft.shorten();
                Action::None
            }
            KeyCode::Backspace => {
                draft.query.pop();
                Action::Search
            }
            KeyCode::Char(c) => {
                draft.query.push(c);
                Action::Search
            }
            _ => Action::None,
        };
    }

    let reload = !state.sample;
    match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => {
            state.show_help = true;
            Action::None
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.view.navigate(Direction::Previous);
            if reload { Action::Reload } else { Action::None }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.view.navigate(Direction::Next);
            if reload { Action::Reload } else { Action::None }
        }
        KeyCode::Char('t') => {
            state.view.go_to_today();
            if reload { Action::Reload } else { Action::None }
        }
        KeyCode::Char('d') => {
            state.view.set_view(ViewMode::Day);
            if reload { Action::Reload } else { Action::None }
        }
        KeyCode::Char('w') => {
            state.view.set_view(ViewMode::Week);
            if reload { Action::Reload } else { Action::None }
        }
        KeyCode::Tab => {
            state.view.cycle_focused_groomer();
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_rows = state.scroll_rows.saturating_add(ROWS_PER_HOUR);
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_rows = state.scroll_rows.saturating_sub(ROWS_PER_HOUR);
            Action::None
        }
        KeyCode::Char('r') => Action::Reload,
        _ => Action::None,
    }
}

fn dispatch_search(
    state: &mut TuiState,
    backend: &Backend,
    tx: &mpsc::UnboundedSender<SearchUpdate>,
) {
    let Some(draft) = state.overlay.booking.as_mut() else {
        return;
    };

    match backend {
        Backend::Sample { min_query_len } => {
            let results = if draft.query.trim().chars().count() < *min_query_len {
                Vec::new()
            } else {
                search_sample_pets(&draft.query)
            };
            draft.set_results(results);
        }
        Backend::Remote { search, .. } => {
            let search = search.clone();
            let tx = tx.clone();
            let query = draft.query.clone();
            tokio::spawn(async move {
                match search.search(&query).await {
                    Ok(Some(results)) => {
                        let _ = tx.send(SearchUpdate::Results { query, results });
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Pet search for {:?} failed: {}", query, e);
                        let _ = tx.send(SearchUpdate::Failed(e.to_string()));
                    }
                }
            });
        }
    }
}

fn apply_search_update(state: &mut TuiState, update: SearchUpdate) {
    match update {
        SearchUpdate::Results { query, results } => {
            if let Some(draft) = state.overlay.booking.as_mut()
                && draft.query == query
            {
                draft.set_results(results);
            }
        }
        SearchUpdate::Failed(message) => {
            state.status = StatusLine::Error(format!("Pet search failed: {}", message));
        }
    }
}

/// Returns whether the calendar should be reloaded.
async fn submit_booking(state: &mut TuiState, backend: &Backend) -> bool {
    let Some(draft) = state.overlay.booking.as_ref() else {
        return false;
    };
    let Some(pet) = draft.selected_pet().cloned() else {
        state.status = StatusLine::Error("Pick a pet before booking".to_string());
        return false;
    };

    let request = match BookingRequest::for_slot(draft.slot, pet.pet_id, draft.duration_minutes) {
        Ok(request) => request,
        Err(e) => {
            state.status = StatusLine::Error(e.to_string());
            return false;
        }
    };

    match backend {
        Backend::Remote { loader, .. } => match loader.book(&request).await {
            Ok(confirmation) => {
                state.overlay.close();
                state.status = StatusLine::Info(format!(
                    "Booked {} with {} (#{})",
                    confirmation.pet_name, confirmation.staff_name, confirmation.id
                ));
                true
            }
            Err(e) => {
                tracing::error!("Booking failed: {}", e);
                state.status = StatusLine::Error(format!("Booking failed: {}", e));
                false
            }
        },
        Backend::Sample { .. } => {
            match book_locally(state, &request, &pet) {
                Ok(id) => {
                    state.overlay.close();
                    state.status = StatusLine::Info(format!("Booked {} (#{})", pet.pet_name, id));
                }
                Err(message) => state.status = StatusLine::Error(message),
            }
            false
        }
    }
}

fn book_locally(
    state: &mut TuiState,
    request: &BookingRequest,
    pet: &PetSearchResult,
) -> Result<i64, String> {
    let date = request.appointment_datetime.date();
    let time = request.appointment_datetime.time();
    let start = ClockTime::from_hm(time.hour(), time.minute()).map_err(|e| e.to_string())?;
    let end = ClockTime::from_minutes(start.minutes() + request.duration_minutes)
        .map_err(|_| "Booking would run past midnight".to_string())?;

    let id = state.view.appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1;
    let mut appointment = Appointment::new(id, request.staff_id, date, start, end)
        .map_err(|e| e.to_string())?
        .with_details(pet.pet_name.clone(), pet.family_name.clone(), "Grooming");
    appointment.groomer = state
        .view
        .groomer(request.staff_id)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    state.view.add_appointment(appointment);
    Ok(id)
}
