use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let roster = &app.roster;
    let start = (roster.selected / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(roster.users.len());
    let slice = &roster.users[start.min(end)..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == roster.selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.clone()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(12), Constraint::Percentage(40), Constraint::Percentage(60)];
    let header = Row::new(vec!["ID", "NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if roster.loading { "Users (loading...)" } else { "Users" };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.roster.selected_user() {
        Some(u) => format!("ID: {}\nName: {}\nEmail: {}", u.id, u.name, u.email),
        None => "No user selected".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
