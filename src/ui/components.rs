//! Shared UI components (status bar, overlays, toasts).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode, Theme};
use crate::notify::{ToastKind, Toasts};
use std::collections::{BTreeMap, BTreeSet};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Dialog => "EDIT",
        InputMode::Help => "HELP",
    };
    let filter = if app.search_query.is_empty() {
        String::new()
    } else {
        format!("  filter:{}", app.search_query)
    };
    let saving = if app.dialog.is_pending() { "  saving..." } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}/{}  rows/page:{}{}{}",
        app.roster.users.len(),
        app.roster.users_all.len(),
        app.rows_per_page,
        filter,
        saving
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn action_label(action: KeyAction) -> Option<&'static str> {
    match action {
        KeyAction::Quit => Some("Quit"),
        KeyAction::StartSearch => Some("Search"),
        KeyAction::EditUser => Some("Edit user"),
        KeyAction::Refresh => Some("Refresh list"),
        KeyAction::OpenHelp => Some("Help"),
        KeyAction::MoveUp => Some("Move up"),
        KeyAction::MoveDown => Some("Move down"),
        KeyAction::PageUp => Some("Page up"),
        KeyAction::PageDown => Some("Page down"),
        KeyAction::Ignore => None,
    }
}

/// Render the help overlay: configured bindings plus the fixed dialog keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let mut grouped: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        if let Some(label) = action_label(action) {
            grouped
                .entry(label)
                .or_default()
                .insert(Keymap::format_key(mods, code));
        }
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Users list:", bold))];
    for (label, keys) in grouped {
        let joined = keys.into_iter().collect::<Vec<_>>().join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>14} │ ", label)),
            Span::styled(joined, italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Edit dialog:", bold)));
    for (label, keys) in [
        ("Next field", "Tab, Down, Enter"),
        ("Previous field", "Shift+Tab, Up"),
        ("Submit", "Enter on [Save], Ctrl+s"),
        ("Close", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>14} │ ", label)),
            Span::styled(keys, italic),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help (Esc to close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Stack visible toasts in the top-right corner, newest at the bottom.
pub fn render_toasts(f: &mut Frame, area: Rect, toasts: &Toasts, theme: &Theme) {
    let width = 36u16.min(area.width);
    let mut y = area.y + 1;
    for toast in toasts.items() {
        if y + 3 > area.y + area.height {
            break;
        }
        let color = match toast.kind {
            ToastKind::Success => theme.success,
            ToastKind::Error => theme.error,
        };
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let p = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += 3;
    }
}
