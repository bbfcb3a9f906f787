//! Edit-user dialog: form state bound to one user record, and submit handling.
//!
//! The dialog is driven like a component with props. The host calls
//! [`EditUserDialog::sync`] with the current `open` flag and target user every
//! frame, routes key presses through [`EditUserDialog::handle_key`], and reports
//! outcomes back through [`EditCallbacks`].
//!
//! Submitting is split in two halves so the network call can run elsewhere:
//! [`EditUserDialog::submit`] validates and builds an [`UpdateRequest`], and
//! [`EditUserDialog::complete`] applies the result. At most one request per
//! dialog session is in flight; activations while one is pending are ignored.
//! Reopening or switching user starts a new session with a free Save button.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{ApiError, User, UserApi, UserUpdate};
use crate::credentials::CredentialProvider;
use crate::notify::{MSG_MISSING_ID, MSG_UPDATE_FAILED, MSG_UPDATE_OK, Notifier};

/// Focusable controls of the dialog, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Password,
    Submit,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Name => Field::Password,
            Field::Password => Field::Submit,
            Field::Submit => Field::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Name => Field::Submit,
            Field::Password => Field::Name,
            Field::Submit => Field::Password,
        }
    }
}

/// Values the user is editing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub password: String,
}

impl FormState {
    /// Fresh form for `user`. The password never carries over.
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Host-side reactions to the dialog.
pub trait EditCallbacks {
    /// Called with the edited record after the backend accepted the update.
    fn on_update(&mut self, user: User);
    /// Called when the dialog asks to be dismissed.
    fn on_close(&mut self);
}

/// Identifies one submit and the dialog session (open/reset cycle) it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubmitTicket {
    pub id: u64,
    pub session: u64,
}

/// Everything needed to perform one update, captured at submit time.
#[derive(Clone)]
pub struct UpdateRequest {
    pub ticket: SubmitTicket,
    pub user_id: String,
    /// Echoed back to `on_update`; the backend response is not consulted.
    pub email: String,
    pub update: UserUpdate,
    pub token: Option<String>,
}

impl std::fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("ticket", &self.ticket)
            .field("user_id", &self.user_id)
            .field("name", &self.update.name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// What the host should do after a key press inside the dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogIntent {
    None,
    Submit,
    Close,
}

#[derive(Clone, Debug)]
pub struct EditUserDialog {
    open: bool,
    user: User,
    form: FormState,
    focus: Field,
    session: u64,
    next_ticket: u64,
    pending: Option<SubmitTicket>,
}

impl EditUserDialog {
    pub fn new(open: bool, user: User) -> Self {
        let form = FormState::for_user(&user);
        Self {
            open,
            user,
            form,
            focus: Field::Name,
            session: 1,
            next_ticket: 1,
            pending: None,
        }
    }

    /// Apply the host's current props.
    ///
    /// Opening the dialog or switching to a different user resets the form to
    /// `{ name: user.name, password: "" }`.
    pub fn sync(&mut self, open: bool, user: &User) {
        let opening = open && !self.open;
        let user_changed = self.user != *user;
        self.open = open;
        if user_changed {
            self.user = user.clone();
        }
        if opening || user_changed {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.form = FormState::for_user(&self.user);
        self.focus = Field::Name;
        self.session += 1;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Whether the current session has a request in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
            .is_some_and(|ticket| ticket.session == self.session)
    }

    /// Replace the value of a text field.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Name => self.form.name = value.into(),
            Field::Password => self.form.password = value.into(),
            Field::Submit => {}
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Name => Some(&mut self.form.name),
            Field::Password => Some(&mut self.form.password),
            Field::Submit => None,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> DialogIntent {
        match key.code {
            KeyCode::Esc => return DialogIntent::Close,
            KeyCode::Char('s') | KeyCode::Char('S')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return DialogIntent::Submit;
            }
            KeyCode::Enter => {
                if self.focus == Field::Submit {
                    return DialogIntent::Submit;
                }
                self.focus = self.focus.next();
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(text) = self.focused_text() {
                    text.push(c);
                }
            }
            _ => {}
        }
        DialogIntent::None
    }

    /// Explicit dismissal; no request is made.
    pub fn close(&mut self, callbacks: &mut dyn EditCallbacks) {
        callbacks.on_close();
    }

    /// Validate and capture an update request.
    ///
    /// Returns `None` without side effects beyond notification when the user
    /// id is empty, and silently when a request is already in flight. The
    /// token is read from `credentials` here, not when the dialog opened.
    pub fn submit(
        &mut self,
        credentials: &dyn CredentialProvider,
        notifier: &mut dyn Notifier,
    ) -> Option<UpdateRequest> {
        if self.user.id.is_empty() {
            tracing::warn!(name = %self.user.name, "update aborted: user id is missing");
            notifier.error(MSG_MISSING_ID);
            return None;
        }
        if let Some(ticket) = self.pending
            && ticket.session == self.session
        {
            tracing::debug!(ticket = ticket.id, "submit ignored: update already in flight");
            return None;
        }

        let ticket = SubmitTicket {
            id: self.next_ticket,
            session: self.session,
        };
        self.next_ticket += 1;
        self.pending = Some(ticket);

        let token = credentials.token();
        if token.is_none() {
            tracing::debug!("no stored token; sending empty bearer credential");
        }
        tracing::info!(user_id = %self.user.id, ticket = ticket.id, "submitting user update");
        Some(UpdateRequest {
            ticket,
            user_id: self.user.id.clone(),
            email: self.user.email.clone(),
            update: UserUpdate {
                name: self.form.name.clone(),
                password: self.form.password.clone(),
            },
            token,
        })
    }

    /// Apply the outcome of a request produced by [`submit`](Self::submit).
    ///
    /// Success notifies, hands `{id, name, email}` to `on_update` and closes
    /// the dialog if it is still showing the session that submitted. Failure
    /// notifies and leaves the form untouched for another attempt.
    pub fn complete(
        &mut self,
        request: UpdateRequest,
        result: Result<(), ApiError>,
        notifier: &mut dyn Notifier,
        callbacks: &mut dyn EditCallbacks,
    ) {
        if self.pending == Some(request.ticket) {
            self.pending = None;
        }
        match result {
            Ok(()) => {
                tracing::info!(user_id = %request.user_id, "user updated");
                notifier.success(MSG_UPDATE_OK);
                let same_session = self.open && request.ticket.session == self.session;
                callbacks.on_update(User {
                    id: request.user_id,
                    name: request.update.name,
                    email: request.email,
                });
                if same_session {
                    callbacks.on_close();
                } else {
                    tracing::debug!(ticket = request.ticket.id, "dialog moved on; not closing");
                }
            }
            Err(err) => {
                tracing::error!(user_id = %request.user_id, error = %err, "user update failed");
                notifier.error(MSG_UPDATE_FAILED);
            }
        }
    }

    /// Submit and wait for the result on the current thread.
    ///
    /// Returns whether a request was issued.
    pub fn submit_with(
        &mut self,
        api: &dyn UserApi,
        credentials: &dyn CredentialProvider,
        notifier: &mut dyn Notifier,
        callbacks: &mut dyn EditCallbacks,
    ) -> bool {
        let Some(request) = self.submit(credentials, notifier) else {
            return false;
        };
        let result = api.update_user(&request.user_id, &request.update, request.token.as_deref());
        self.complete(request, result, notifier, callbacks);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentials;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        successes: Vec<String>,
        errors: Vec<String>,
    }

    impl Notifier for Recorder {
        fn success(&mut self, message: &str) {
            self.successes.push(message.to_string());
        }
        fn error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct Host {
        updates: Vec<User>,
        closes: usize,
    }

    impl EditCallbacks for Host {
        fn on_update(&mut self, user: User) {
            self.updates.push(user);
        }
        fn on_close(&mut self) {
            self.closes += 1;
        }
    }

    struct FakeApi {
        fail: bool,
        calls: Mutex<Vec<(String, UserUpdate, Option<String>)>>,
    }

    impl FakeApi {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl UserApi for FakeApi {
        fn list_users(&self, _: Option<&str>) -> Result<Vec<User>, ApiError> {
            Ok(Vec::new())
        }

        fn update_user(
            &self,
            id: &str,
            update: &UserUpdate,
            token: Option<&str>,
        ) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((id.to_string(), update.clone(), token.map(str::to_string)));
            if self.fail {
                Err(ApiError::Disconnected)
            } else {
                Ok(())
            }
        }
    }

    fn alice() -> User {
        User::new("42", "Alice", "a@x.com")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opening_resets_fields_regardless_of_prior_edits() {
        let mut dialog = EditUserDialog::new(false, alice());
        dialog.sync(true, &alice());
        dialog.edit(Field::Name, "Mallory");
        dialog.edit(Field::Password, "hunter2");
        dialog.sync(false, &alice());
        dialog.sync(true, &alice());
        assert_eq!(dialog.form().name, "Alice");
        assert_eq!(dialog.form().password, "");
        assert_eq!(dialog.focus(), Field::Name);
    }

    #[test]
    fn switching_user_resets_fields() {
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.edit(Field::Password, "secret");
        let bob = User::new("7", "Bob", "b@x.com");
        dialog.sync(true, &bob);
        assert_eq!(dialog.form().name, "Bob");
        assert_eq!(dialog.form().password, "");
    }

    #[test]
    fn staying_open_keeps_edits() {
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.edit(Field::Name, "Ali");
        dialog.sync(true, &alice());
        assert_eq!(dialog.form().name, "Ali");
    }

    #[test]
    fn successful_submit_updates_and_closes() {
        let api = FakeApi::new(false);
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(false, alice());
        dialog.sync(true, &alice());
        dialog.edit(Field::Name, "Alicia");

        assert!(dialog.submit_with(&api, &creds, &mut notes, &mut host));

        assert_eq!(host.updates, vec![User::new("42", "Alicia", "a@x.com")]);
        assert_eq!(host.closes, 1);
        assert_eq!(notes.successes, vec![MSG_UPDATE_OK.to_string()]);
        assert!(notes.errors.is_empty());
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "42");
        assert_eq!(calls[0].1.name, "Alicia");
        assert_eq!(calls[0].1.password, "");
        assert_eq!(calls[0].2.as_deref(), Some("tok"));
        assert!(!dialog.is_pending());
    }

    #[test]
    fn failed_submit_keeps_dialog_open() {
        let api = FakeApi::new(true);
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.edit(Field::Name, "Alicia");
        dialog.edit(Field::Password, "n3w");

        assert!(dialog.submit_with(&api, &creds, &mut notes, &mut host));

        assert!(host.updates.is_empty());
        assert_eq!(host.closes, 0);
        assert_eq!(notes.errors, vec![MSG_UPDATE_FAILED.to_string()]);
        assert!(notes.successes.is_empty());
        assert_eq!(dialog.form().name, "Alicia");
        assert_eq!(dialog.form().password, "n3w");
        assert!(dialog.is_open());
        assert!(!dialog.is_pending());
    }

    #[test]
    fn empty_id_never_issues_a_request() {
        let api = FakeApi::new(false);
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, User::new("", "Ghost", "g@x.com"));

        assert!(!dialog.submit_with(&api, &creds, &mut notes, &mut host));

        assert!(api.calls.lock().unwrap().is_empty());
        assert_eq!(notes.errors, vec![MSG_MISSING_ID.to_string()]);
        assert!(notes.successes.is_empty());
        assert!(host.updates.is_empty());
        assert_eq!(host.closes, 0);
    }

    #[test]
    fn second_submit_while_pending_is_ignored() {
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, alice());

        let first = dialog.submit(&creds, &mut notes).expect("first submit");
        assert!(dialog.is_pending());
        assert!(dialog.submit(&creds, &mut notes).is_none());
        assert!(notes.errors.is_empty() && notes.successes.is_empty());

        dialog.complete(first, Ok(()), &mut notes, &mut host);
        assert!(!dialog.is_pending());
        assert!(dialog.submit(&creds, &mut notes).is_some());
    }

    #[test]
    fn token_is_read_at_submit_time() {
        let mut creds = MemoryCredentials::default();
        let mut notes = Recorder::default();
        let mut dialog = EditUserDialog::new(false, alice());
        dialog.sync(true, &alice());
        creds.set(crate::credentials::TOKEN_KEY, "fresh");
        let req = dialog.submit(&creds, &mut notes).unwrap();
        assert_eq!(req.token.as_deref(), Some("fresh"));
    }

    #[test]
    fn password_edits_never_touch_email() {
        let creds = MemoryCredentials::with_token("tok");
        let api = FakeApi::new(false);
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.edit(Field::Password, "a@evil.com");
        dialog.submit_with(&api, &creds, &mut notes, &mut host);
        assert_eq!(host.updates[0].email, "a@x.com");
    }

    #[test]
    fn late_success_after_reopen_updates_without_closing() {
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, alice());
        let req = dialog.submit(&creds, &mut notes).unwrap();
        dialog.sync(false, &alice());
        dialog.sync(true, &alice());

        dialog.complete(req, Ok(()), &mut notes, &mut host);
        assert_eq!(host.updates.len(), 1);
        assert_eq!(host.closes, 0);
        assert_eq!(notes.successes.len(), 1);
    }

    #[test]
    fn request_for_previous_user_does_not_block_the_next_one() {
        let creds = MemoryCredentials::with_token("tok");
        let mut notes = Recorder::default();
        let mut host = Host::default();
        let bob = User::new("7", "Bob", "b@x.com");
        let mut dialog = EditUserDialog::new(true, alice());
        let for_alice = dialog.submit(&creds, &mut notes).unwrap();

        dialog.sync(false, &alice());
        dialog.sync(true, &bob);
        assert!(!dialog.is_pending());
        let for_bob = dialog.submit(&creds, &mut notes).expect("bob can submit");
        assert_eq!(for_bob.user_id, "7");

        dialog.complete(for_alice, Ok(()), &mut notes, &mut host);
        assert!(dialog.is_pending());
        assert_eq!(host.closes, 0);

        dialog.complete(for_bob, Ok(()), &mut notes, &mut host);
        assert!(!dialog.is_pending());
        assert_eq!(host.closes, 1);
        assert_eq!(host.updates.len(), 2);
    }

    #[test]
    fn keys_edit_focused_field_and_submit_from_button() {
        let mut dialog = EditUserDialog::new(true, alice());
        assert_eq!(dialog.handle_key(&key(KeyCode::Backspace)), DialogIntent::None);
        dialog.handle_key(&key(KeyCode::Char('x')));
        assert_eq!(dialog.form().name, "Alicx");
        dialog.handle_key(&key(KeyCode::Tab));
        dialog.handle_key(&key(KeyCode::Char('p')));
        assert_eq!(dialog.form().password, "p");
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter)), DialogIntent::None);
        assert_eq!(dialog.focus(), Field::Submit);
        dialog.handle_key(&key(KeyCode::Char('z')));
        assert_eq!(dialog.form().password, "p");
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter)), DialogIntent::Submit);
        assert_eq!(dialog.handle_key(&key(KeyCode::Esc)), DialogIntent::Close);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(dialog.handle_key(&ctrl_s), DialogIntent::Submit);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.edit(Field::Password, "hunter2");
        let creds = MemoryCredentials::with_token("s3cr3t");
        let mut notes = Recorder::default();
        let req = dialog.submit(&creds, &mut notes).unwrap();
        let dump = format!("{req:?} {:?}", dialog.form());
        assert!(!dump.contains("hunter2"));
        assert!(!dump.contains("s3cr3t"));
    }

    #[test]
    fn explicit_close_calls_on_close_only() {
        let mut host = Host::default();
        let mut dialog = EditUserDialog::new(true, alice());
        dialog.close(&mut host);
        assert_eq!(host.closes, 1);
        assert!(host.updates.is_empty());
    }
}
