use chrono::{DateTime, NaiveDateTime};
use ratatui::{prelude::*, widgets::*};

use crate::models::AppointmentStatus;

/// Renders tabs
pub fn render_tabs<'a>(titles: Vec<String>, selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.into_iter().map(Line::from).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Renders a labelled form field with focus/editing highlight
pub fn render_field<'a>(label: &'a str, value: &'a str, placeholder: &'a str, focused: bool, editing: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_span = if value.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else if focused && editing {
        Span::styled(value, Style::default().fg(Color::Yellow))
    } else {
        Span::raw(value)
    };
    let cursor = if focused && editing { "_" } else { "" };

    Line::from(vec![
        Span::styled(if focused { "> " } else { "  " }, label_style),
        Span::styled(format!("{:<12}", label), label_style),
        value_span,
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

/// Status badge color
pub fn status_color(status: &AppointmentStatus) -> Color {
    match status {
        AppointmentStatus::Scheduled => Color::Green,
        AppointmentStatus::Completed => Color::Blue,
        AppointmentStatus::Pending => Color::Yellow,
        AppointmentStatus::Cancelled => Color::Red,
        AppointmentStatus::Other(_) => Color::Gray,
    }
}

const DISPLAY_FORMAT: &str = "%a, %b %-d, %Y %H:%M";

/// Human-readable scheduled time, or the raw string if it does not parse
pub fn format_scheduled_time(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

/// Header indicator for the liveness probe
pub fn backend_indicator(online: Option<bool>) -> Span<'static> {
    match online {
        Some(true) => Span::styled(" [+] Connected ", Style::default().fg(Color::Green)),
        Some(false) => Span::styled(" [-] Offline ", Style::default().fg(Color::Red)),
        None => Span::styled(" [?] Checking ", Style::default().fg(Color::DarkGray)),
    }
}
