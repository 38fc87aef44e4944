use chrono::{DateTime, Local};
use report_core::{
    AppViewModel, DisplayStatus, NoticeLevel, PollMode, ReportId, ReportRowView, StatusStyle,
};

use crate::platform::input::HELP;

const RESET: &str = "\x1b[0m";

/// Everything the screen shows besides the view model.
pub struct Frame<'a> {
    pub base_url: &'a str,
    pub refreshed_at: &'a str,
    /// Delete waiting for a y/n answer.
    pub prompt: Option<ReportId>,
    pub color: bool,
}

pub fn render(view: &AppViewModel, frame: &Frame<'_>) -> Vec<String> {
    let polling = match view.polling {
        PollMode::Active => "live",
        PollMode::Suspended => "paused",
    };
    let mut lines = vec![
        format!("Smart Report Generator  [{}]", frame.base_url),
        format!("sync: {polling} | updated {}", frame.refreshed_at),
    ];

    lines.push(if view.create_pending {
        "[new] Generating...".to_string()
    } else {
        "[new] Generate Report".to_string()
    });
    lines.push(String::new());

    if view.loading {
        lines.push("Loading reports...".to_string());
    } else if view.reports.is_empty() {
        lines.push("No reports yet.".to_string());
    } else {
        lines.extend(view.reports.iter().map(|row| render_row(row, frame.color)));
    }

    if let Some(notice) = &view.notice {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        lines.push(String::new());
        lines.push(format!("{tag}: {}", notice.message));
    }

    lines.push(String::new());
    match frame.prompt {
        Some(id) => lines.push(format!("Delete report #{id}? [y/N]")),
        None => lines.push(HELP.to_string()),
    }
    lines
}

fn render_row(row: &ReportRowView, color: bool) -> String {
    let badge = format!("{} {}", row.style.icon, row.status);
    let badge = if color {
        paint(&badge, row.style)
    } else {
        badge
    };
    let action = if row.deleting { "Deleting..." } else { "[del]" };
    let mut line = format!("#{} - {}  {}", row.id, row.title, badge);
    if row.status == DisplayStatus::Retrying {
        line.push_str(&format!(" x{}", row.retry_count));
    }
    line.push_str(&format!("  {action}"));
    let created = format_timestamp(&row.created_at);
    match row.completed_at.as_deref().map(format_timestamp) {
        Some(completed) if !created.is_empty() => {
            line.push_str(&format!("  ({created}, done {completed})"));
        }
        Some(completed) => line.push_str(&format!("  (done {completed})")),
        None if !created.is_empty() => line.push_str(&format!("  ({created})")),
        None => {}
    }
    if let Some(url) = &row.result_url {
        line.push_str(&format!("  -> {url}"));
    }
    line
}

/// Local short time for RFC 3339 timestamps; anything else is shown as sent.
fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn paint(text: &str, style: StatusStyle) -> String {
    match hex_rgb(style.color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}{RESET}"),
        None => text.to_string(),
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
