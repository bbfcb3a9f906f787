pub mod components;
pub mod edit_user;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(root[1]);

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}", app.search_query),
        InputMode::Normal | InputMode::Dialog | InputMode::Help => String::new(),
    };
    let p = Paragraph::new(format!(
        "{}  users:{}{}  | Enter: edit; /: search; r: refresh; ?: help; q: quit",
        app.base_url,
        app.roster.users.len(),
        prompt
    ))
    .block(
        Block::default()
            .title("usredit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    if app.dialog.is_open() {
        edit_user::render_edit_dialog(f, f.area(), &app.dialog, &app.theme);
    }
    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, f.area(), app);
    }
    components::render_toasts(f, f.area(), &app.toasts, &app.theme);
}
