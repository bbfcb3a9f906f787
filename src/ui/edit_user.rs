//! Presentation of the edit-user dialog. Pure function of the dialog state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Theme;
use crate::app::edit_user::{EditUserDialog, Field};
use crate::ui::components::centered_rect;

fn field_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let color = if focused { theme.highlight_fg } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

pub fn render_edit_dialog(f: &mut Frame, area: Rect, dialog: &EditUserDialog, theme: &Theme) {
    if !dialog.is_open() {
        return;
    }
    let width = 56u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 13, area);
    let outer = Block::default()
        .title("Edit user")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = outer.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(outer, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let user = dialog.user();
    let email = Paragraph::new(format!("{}  <{}>", user.id, user.email))
        .style(Style::default().fg(theme.muted));
    f.render_widget(email, rows[0]);

    let form = dialog.form();
    let focus = dialog.focus();

    let name = Paragraph::new(form.name.clone())
        .style(Style::default().fg(theme.text))
        .block(field_block("Name", focus == Field::Name, theme));
    f.render_widget(name, rows[1]);

    let masked = "*".repeat(form.password.chars().count());
    let password = Paragraph::new(masked)
        .style(Style::default().fg(theme.text))
        .block(field_block("Password", focus == Field::Password, theme));
    f.render_widget(password, rows[2]);

    let label = if dialog.is_pending() { "[ Saving... ]" } else { "[ Save ]" };
    let mut button = Style::default().fg(theme.text);
    if focus == Field::Submit {
        button = button
            .fg(theme.highlight_fg)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    let controls = Line::from(vec![
        Span::styled(label, button),
        Span::styled("   Esc: close", Style::default().fg(theme.muted)),
    ]);
    f.render_widget(Paragraph::new(controls), rows[4]);

    match focus {
        Field::Name => f.set_cursor_position((
            rows[1].x + 1 + form.name.chars().count() as u16,
            rows[1].y + 1,
        )),
        Field::Password => f.set_cursor_position((
            rows[2].x + 1 + form.password.chars().count() as u16,
            rows[2].y + 1,
        )),
        Field::Submit => {}
    }
}
