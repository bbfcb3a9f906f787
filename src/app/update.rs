use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};

use crate::api::ApiError;
use crate::api::worker::{ApiJob, ApiReply, ApiWorker};
use crate::app::edit_user::DialogIntent;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::credentials::CredentialProvider;
use crate::notify::Notifier;
use crate::search::apply_search;
use crate::ui;

const MSG_LIST_FAILED: &str = "Failed to load users";

/// Whether the loop keeps going after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    worker: &ApiWorker,
    credentials: &dyn CredentialProvider,
) -> Result<()> {
    request_users(app, worker, credentials);

    loop {
        while let Some(reply) = worker.try_recv() {
            apply_reply(app, reply);
        }
        app.toasts.prune(Instant::now());

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, &key, worker, credentials) == Flow::Quit
        {
            break;
        }
    }

    Ok(())
}

/// Ask the worker for the user list, reading the token now.
pub fn request_users(app: &mut AppState, worker: &ApiWorker, credentials: &dyn CredentialProvider) {
    app.roster.loading = true;
    let job = ApiJob::ListUsers {
        token: credentials.token(),
    };
    if worker.send(job).is_err() {
        tracing::error!("api worker unavailable; cannot list users");
        app.roster.loading = false;
        app.toasts.error(MSG_LIST_FAILED);
    }
}

/// Fold a worker reply into the state.
pub fn apply_reply(app: &mut AppState, reply: ApiReply) {
    match reply {
        ApiReply::Users(Ok(users)) => {
            tracing::info!(count = users.len(), "loaded users");
            app.roster.loading = false;
            app.roster.set_users(users);
            apply_search(&mut app.roster, &app.search_query);
        }
        ApiReply::Users(Err(err)) => {
            tracing::error!(error = %err, "listing users failed");
            app.roster.loading = false;
            app.toasts.error(MSG_LIST_FAILED);
        }
        ApiReply::Updated { request, result } => {
            app.dialog
                .complete(request, result, &mut app.toasts, &mut app.roster);
        }
    }
    app.sync_dialog();
}

pub fn handle_key(
    app: &mut AppState,
    key: &KeyEvent,
    worker: &ApiWorker,
    credentials: &dyn CredentialProvider,
) -> Flow {
    match app.input_mode {
        InputMode::Normal => match app.keymap.resolve(key) {
            Some(KeyAction::Quit) => return Flow::Quit,
            Some(KeyAction::StartSearch) => {
                app.search_query.clear();
                app.input_mode = InputMode::Search;
            }
            Some(KeyAction::EditUser) => {
                if app.roster.open_editor() {
                    app.sync_dialog();
                }
            }
            Some(KeyAction::Refresh) => request_users(app, worker, credentials),
            Some(KeyAction::OpenHelp) => app.input_mode = InputMode::Help,
            Some(KeyAction::MoveUp) => app.roster.move_selection(-1),
            Some(KeyAction::MoveDown) => app.roster.move_selection(1),
            Some(KeyAction::PageUp) => {
                let rpp = app.rows_per_page.max(1) as isize;
                app.roster.move_selection(-rpp);
            }
            Some(KeyAction::PageDown) => {
                let rpp = app.rows_per_page.max(1) as isize;
                app.roster.move_selection(rpp);
            }
            Some(KeyAction::Ignore) | None => {}
        },
        InputMode::Search => match key.code {
            KeyCode::Enter => {
                apply_search(&mut app.roster, &app.search_query);
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                app.search_query.clear();
                apply_search(&mut app.roster, "");
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                app.search_query.pop();
            }
            KeyCode::Char(c) => app.search_query.push(c),
            _ => {}
        },
        InputMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
                app.input_mode = InputMode::Normal;
            }
        }
        InputMode::Dialog => {
            match app.dialog.handle_key(key) {
                DialogIntent::None => {}
                DialogIntent::Close => app.dialog.close(&mut app.roster),
                DialogIntent::Submit => submit_dialog(app, worker, credentials),
            }
            app.sync_dialog();
        }
    }
    Flow::Continue
}

/// Start an update from the dialog's current form and hand it to the worker.
fn submit_dialog(app: &mut AppState, worker: &ApiWorker, credentials: &dyn CredentialProvider) {
    let Some(request) = app.dialog.submit(credentials, &mut app.toasts) else {
        return;
    };
    if let Err(ApiJob::UpdateUser(request)) = worker.send(ApiJob::UpdateUser(request)) {
        app.dialog.complete(
            request,
            Err(ApiError::Disconnected),
            &mut app.toasts,
            &mut app.roster,
        );
    }
}
