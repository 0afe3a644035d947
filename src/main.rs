//! Meditel Console - actor-based terminal client for the Meditel backend
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - client state synchronizer processing events
//! - Network Layer (Tokio) - async API calls

use std::io;
use std::path::Path;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use meditel_console::app::state::{Banner, BannerKind};
use meditel_console::app::{AppActor, AppState};
use meditel_console::config::Config;
use meditel_console::constants::{APP_NAME, DEFAULT_LOG_FILE};
use meditel_console::messages::ui_events::{key_to_ui_event, AppTab, FormField, InputMode};
use meditel_console::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use meditel_console::network::NetworkActor;
use meditel_console::ui::{backend_indicator, format_scheduled_time, render_field, render_tabs, status_color};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging to file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(api_base = %config.api_base, timeout_secs = config.request_timeout_secs, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(&config, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(config.api_base.clone()), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_tab,
                    current_state.focused_field,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Length(1),  // Tab bar
            Constraint::Length(1),  // Banner
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);
    draw_tab_bar(f, state, main_chunks[1]);
    draw_banner(f, state.banner.as_ref(), main_chunks[2]);

    match state.active_tab {
        AppTab::Appointments => draw_appointments_tab(f, state, main_chunks[3]),
        AppTab::Doctors => draw_doctors_tab(f, state, main_chunks[3]),
        AppTab::Patients => draw_patients_tab(f, state, main_chunks[3]),
        AppTab::Create => draw_create_tab(f, state, main_chunks[3]),
    }

    draw_status_bar(f, state, main_chunks[4]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let header = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", state.api_base), Style::default().fg(Color::DarkGray)),
        backend_indicator(state.backend_online),
        Span::raw(format!(
            " {} appointments | {} doctors | {} patients",
            state.total_appointments,
            state.doctors.len(),
            state.patients.len()
        )),
        Span::styled(
            if state.is_loading { "  [...]" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles = AppTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let count = match tab {
                AppTab::Appointments => Some(state.total_appointments),
                AppTab::Doctors => Some(state.doctors.len()),
                AppTab::Patients => Some(state.patients.len()),
                AppTab::Create => None,
            };
            match count {
                Some(n) => format!(" {}:{} ({}) ", i + 1, tab.title(), n),
                None => format!(" {}:{} ", i + 1, tab.title()),
            }
        })
        .collect();
    f.render_widget(render_tabs(titles, state.active_tab.index()), area);
}

fn draw_banner(f: &mut Frame, banner: Option<&Banner>, area: Rect) {
    let line = match banner {
        Some(b) => {
            let (prefix, color) = match b.kind {
                BannerKind::Success => (" OK ", Color::Green),
                BannerKind::Error => (" ERROR ", Color::Red),
            };
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Black).bg(color).bold()),
                Span::styled(format!(" {}", b.text), Style::default().fg(color)),
                Span::styled(
                    if b.kind == BannerKind::Error { "  (Esc to dismiss)" } else { "" },
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_appointments_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .title(" Search appointments (/ to edit) ");
    let search_text = if state.search_term.is_empty() && !editing {
        Span::styled("patient, doctor or symptoms...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.search_term.as_str())
    };
    f.render_widget(Paragraph::new(search_text).block(search_block), chunks[0]);

    if editing {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.search_term.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let list_block = Block::default().borders(Borders::ALL).title(format!(
        " Appointments ({} of {}) ",
        state.appointments.len(),
        state.total_appointments
    ));

    if state.appointments.is_empty() {
        let msg = if state.search_term.is_empty() {
            "No appointments yet. Press 'n' to book one."
        } else {
            "No appointments match your search."
        };
        let empty = Paragraph::new(Span::styled(msg, Style::default().fg(Color::DarkGray)))
            .block(list_block);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for appt in &state.appointments {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<20}", appt.patient_name), Style::default().bold()),
            Span::styled(
                format!(
                    " [{}] ",
                    Some(appt.status.as_str()).filter(|s| !s.is_empty()).unwrap_or("Unknown")
                ),
                Style::default().fg(status_color(&appt.status)).bold(),
            ),
            Span::raw(format!("Dr. {}", appt.doctor_name.trim_start_matches("Dr. "))),
            Span::styled(
                format!("  {}", format_scheduled_time(&appt.scheduled_time)),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        if let Some(symptoms) = appt.symptoms.as_deref().filter(|s| !s.is_empty()) {
            lines.push(Line::from(Span::styled(
                format!("    Symptoms: {}", symptoms),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let list = Paragraph::new(lines)
        .block(list_block)
        .scroll((state.scroll, 0));
    f.render_widget(list, chunks[1]);
}

fn draw_doctors_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Doctors ({}) ", state.doctors.len()));

    let items: Vec<ListItem> = state
        .doctors
        .iter()
        .skip(state.scroll as usize)
        .map(|d| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", d.name), Style::default().bold()),
                Span::styled(format!("{:<20}", d.specialty), Style::default().fg(Color::Magenta)),
                Span::raw(format!("Age {:<4}", d.age)),
                Span::styled(format!("  {}", d.contact), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled("No doctors loaded.", Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(empty, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}

fn draw_patients_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Patients ({}) ", state.patients.len()));

    let items: Vec<ListItem> = state
        .patients
        .iter()
        .skip(state.scroll as usize)
        .map(|p| {
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{:<24}", p.name), Style::default().bold()),
                Span::raw(format!("Age: {}", p.age)),
            ])];
            if let Some(symptoms) = p.symptoms.as_deref().filter(|s| !s.is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("    {}", symptoms),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled("No patients loaded.", Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(empty, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}

fn draw_create_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let forms = &state.forms;
    let editing = state.input_mode == InputMode::Editing;
    let field = |label: &'static str, which: FormField, placeholder: &'static str| {
        render_field(label, forms.field(which), placeholder, state.focused_field == which, editing)
    };

    let doctor = vec![
        field("Name *", FormField::DoctorName, "Dr. John Smith"),
        field("Age", FormField::DoctorAge, "35"),
        field("Specialty *", FormField::DoctorSpecialty, "Cardiology"),
        field("Contact *", FormField::DoctorContact, "email@meditel.com"),
    ];
    let patient = vec![
        field("Name *", FormField::PatientName, "Alice Brown"),
        field("Age *", FormField::PatientAge, "30"),
        field("Symptoms", FormField::PatientSymptoms, "Describe symptoms..."),
    ];
    let appointment = vec![
        field("Patient *", FormField::AppointmentPatient, "Choose a patient... (Enter)"),
        field("Symptoms", FormField::AppointmentSymptoms, "Symptoms for doctor matching"),
        field("When *", FormField::AppointmentTime, "2024-01-15T10:30"),
    ];

    let submit_hint = if state.is_loading { " Creating... " } else { " s: submit " };
    for (i, (title, lines)) in [
        (" Add New Doctor ", doctor),
        (" Add New Patient ", patient),
        (" Book Appointment ", appointment),
    ]
    .into_iter()
    .enumerate()
    {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::from(submit_hint).right_aligned());
        let form = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        f.render_widget(form, columns[i]);
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... (Ctrl+X to cancel) "
    } else if state.input_mode == InputMode::Editing {
        " ESC/Enter:stop editing | Tab:next field "
    } else {
        match state.active_tab {
            AppTab::Create => " ↑/↓:field | e:edit | s:submit | r:refresh | ?:help | q:quit ",
            AppTab::Appointments => " /:search | n:new | r:refresh | S:sync | ?:help | q:quit ",
            _ => " 1-4:tabs | r:refresh | S:sync | h:health | ?:help | q:quit ",
        }
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MEDITEL CONSOLE - Keyboard Shortcuts

 NAVIGATION
   1 2 3 4            Appointments / Doctors / Patients / Create
   Tab / Shift+Tab    Next / previous tab (form field on Create)
   ↑ / ↓              Scroll lists / move between form fields

 APPOINTMENTS
   / or e             Edit search (filters as you type)
   n                  Book a new appointment

 CREATE
   e / Enter          Edit focused field
   ← / →              Choose patient
   s                  Submit the focused form

 BACKEND
   r                  Refresh all data
   S                  Sync system to database
   h                  Check backend health
   Ctrl+X             Cancel request in flight
   Esc                Dismiss message

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
