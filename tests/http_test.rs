// HTTP behavior of the users client against a mock backend.

use httpmock::prelude::*;
use serde_json::json;

use usredit::api::{ApiError, HttpUserApi, User, UserApi, UserUpdate};
use usredit::app::edit_user::{EditCallbacks, EditUserDialog, Field};
use usredit::credentials::MemoryCredentials;
use usredit::notify::{MSG_UPDATE_FAILED, MSG_UPDATE_OK, Notifier};

#[derive(Default)]
struct Seen {
    ok: Vec<String>,
    err: Vec<String>,
}

impl Notifier for Seen {
    fn success(&mut self, message: &str) {
        self.ok.push(message.to_string());
    }
    fn error(&mut self, message: &str) {
        self.err.push(message.to_string());
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

#[test]
fn update_sends_put_with_bearer_and_json_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/42")
            .header("authorization", "Bearer tok")
            .json_body(json!({ "name": "Alicia", "password": "s3cret" }));
        then.status(200);
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let update = UserUpdate {
        name: "Alicia".into(),
        password: "s3cret".into(),
    };
    api.update_user("42", &update, Some("tok")).unwrap();
    mock.assert();
}

#[test]
fn missing_token_sends_empty_bearer_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/42")
            .header("authorization", "Bearer ");
        then.status(200);
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let update = UserUpdate {
        name: "Alicia".into(),
        password: String::new(),
    };
    api.update_user("42", &update, None).unwrap();
    mock.assert();
}

#[test]
fn user_id_with_separators_stays_inside_its_path_segment() {
    let server = MockServer::start();
    let slash = server.mock(|when, then| {
        when.method(PUT).path("/users/a%2Fb");
        then.status(200);
    });
    let query = server.mock(|when, then| {
        when.method(PUT).path("/users/a%3Fb");
        then.status(200);
    });
    let escaped = server.mock(|when, then| {
        when.method(PUT).path("/users/..%2Fadmin");
        then.status(200);
    });
    let admin = server.mock(|when, then| {
        when.method(PUT).path("/admin");
        then.status(200);
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let update = UserUpdate {
        name: "x".into(),
        password: "pw".into(),
    };
    api.update_user("a/b", &update, Some("tok")).unwrap();
    api.update_user("a?b", &update, Some("tok")).unwrap();
    api.update_user("../admin", &update, Some("tok")).unwrap();

    slash.assert();
    query.assert();
    escaped.assert();
    admin.assert_hits(0);
}

#[test]
fn dot_segment_id_is_refused_before_sending() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let update = UserUpdate {
        name: "x".into(),
        password: String::new(),
    };
    let err = api.update_user("..", &update, Some("tok")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl { .. }), "{err}");
    any.assert_hits(0);
}

#[test]
fn non_success_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/users/42");
        then.status(401).body("unauthorized");
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let update = UserUpdate {
        name: "x".into(),
        password: String::new(),
    };
    match api.update_user("42", &update, None) {
        Err(ApiError::Status { status, body, .. }) => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    // Port 9 (discard) is expected to refuse connections on test hosts.
    let api = HttpUserApi::new("http://127.0.0.1:9").unwrap();
    let update = UserUpdate {
        name: "x".into(),
        password: String::new(),
    };
    let err = api.update_user("1", &update, Some("tok")).unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "{err}");
}

#[test]
fn list_users_decodes_records() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/users")
            .header("authorization", "Bearer tok");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([
                { "id": "42", "name": "Alice", "email": "a@x.com" },
                { "id": "7", "name": "Bob", "email": "b@x.com" }
            ]));
    });

    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let users = api.list_users(Some("tok")).unwrap();
    mock.assert();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0], User::new("42", "Alice", "a@x.com"));
}

#[test]
fn dialog_scenario_rename_succeeds() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/42")
            .header("authorization", "Bearer tok")
            .json_body(json!({ "name": "Alicia", "password": "" }));
        then.status(204);
    });
    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let creds = MemoryCredentials::with_token("tok");
    let alice = User::new("42", "Alice", "a@x.com");

    let mut seen = Seen::default();
    let mut host = Host::default();
    let mut dialog = EditUserDialog::new(false, alice.clone());
    dialog.sync(true, &alice);
    dialog.edit(Field::Name, "Alicia");
    assert!(dialog.submit_with(&api, &creds, &mut seen, &mut host));

    mock.assert();
    assert_eq!(host.updates, vec![User::new("42", "Alicia", "a@x.com")]);
    assert_eq!(host.closes, 1);
    assert_eq!(seen.ok, vec![MSG_UPDATE_OK.to_string()]);
    assert!(seen.err.is_empty());
}

#[test]
fn dialog_scenario_server_error_keeps_dialog_open() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/users/42");
        then.status(500);
    });
    let api = HttpUserApi::new(&server.base_url()).unwrap();
    let creds = MemoryCredentials::with_token("tok");
    let alice = User::new("42", "Alice", "a@x.com");

    let mut seen = Seen::default();
    let mut host = Host::default();
    let mut dialog = EditUserDialog::new(true, alice);
    dialog.edit(Field::Name, "Alicia");
    dialog.submit_with(&api, &creds, &mut seen, &mut host);

    assert!(host.updates.is_empty());
    assert_eq!(host.closes, 0);
    assert_eq!(seen.err, vec![MSG_UPDATE_FAILED.to_string()]);
    assert!(dialog.is_open());
    assert_eq!(dialog.form().name, "Alicia");
}
