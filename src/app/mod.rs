//! Application state types and entry glue.
//!
//! Defines the state behind the users screen and the edit dialog, the color
//! theme, and re-exports the event loop entry (`run`).
//!
pub mod edit_user;
pub mod keymap;
pub mod update;

use ratatui::style::Color;

use crate::api::User;
use edit_user::{EditCallbacks, EditUserDialog};
use keymap::Keymap;

use crate::notify::Toasts;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Dialog,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Some(Color::Rgb(r, g, b));
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usredit theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Load from `path`, writing the default theme there first if the file is missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::debug!(error = %err, path, "could not write default theme");
        }
        t
    }
}

/// User list plus the props driving the edit dialog.
///
/// The roster is the dialog's host: it owns `edit_open` and `edit_target`
/// and reacts to [`EditCallbacks`].
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub users_all: Vec<User>,
    pub users: Vec<User>,
    pub selected: usize,
    pub edit_target: Option<User>,
    pub edit_open: bool,
    pub loading: bool,
}

impl Roster {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: users.clone(),
            users_all: users,
            ..Self::default()
        }
    }

    /// Replace the full list, e.g. after a fetch. The visible list is reset to all users.
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users.clone();
        self.users_all = users;
        self.clamp_selection();
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected)
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.users.len().saturating_sub(1));
    }

    /// Move the selection by `delta` rows, staying within the visible list.
    pub fn move_selection(&mut self, delta: isize) {
        let last = self.users.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Target the selected user and open the dialog. Returns false when nothing is selected.
    pub fn open_editor(&mut self) -> bool {
        match self.selected_user().cloned() {
            Some(user) => {
                self.edit_target = Some(user);
                self.edit_open = true;
                true
            }
            None => false,
        }
    }
}

impl EditCallbacks for Roster {
    fn on_update(&mut self, user: User) {
        for list in [&mut self.users_all, &mut self.users] {
            if let Some(slot) = list.iter_mut().find(|u| u.id == user.id) {
                *slot = user.clone();
            }
        }
        if let Some(target) = self.edit_target.as_mut()
            && target.id == user.id
        {
            *target = user;
        }
    }

    fn on_close(&mut self) {
        self.edit_open = false;
    }
}

pub struct AppState {
    pub roster: Roster,
    pub dialog: EditUserDialog,
    pub toasts: Toasts,
    pub input_mode: InputMode,
    pub search_query: String,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: Keymap,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: impl Into<String>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            roster: Roster::default(),
            dialog: EditUserDialog::new(false, User::default()),
            toasts: Toasts::default(),
            input_mode: InputMode::Normal,
            search_query: String::new(),
            rows_per_page: 10,
            theme,
            keymap,
            base_url: base_url.into(),
        }
    }

    /// Push the roster's props into the dialog and follow its visibility with the input mode.
    pub fn sync_dialog(&mut self) {
        let target = self.roster.edit_target.clone().unwrap_or_default();
        self.dialog.sync(self.roster.edit_open, &target);
        if self.dialog.is_open() {
            self.input_mode = InputMode::Dialog;
        } else if self.input_mode == InputMode::Dialog {
            self.input_mode = InputMode::Normal;
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
