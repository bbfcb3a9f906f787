//! Command-line and environment configuration, plus config file locations.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, simple_error};

const APP_DIR: &str = "usredit";

/// Browse users on a remote backend and edit their name and password.
#[derive(Debug, Clone, Parser)]
#[command(name = "usredit", version, about)]
pub struct Args {
    /// Base URL of the users API; requests go to `{base}/users`.
    #[arg(long, env = "USREDIT_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Credential store holding the bearer token under `Token`.
    #[arg(long, env = "USREDIT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// File receiving log output (the terminal belongs to the UI).
    #[arg(long, env = "USREDIT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `usredit=debug`.
    #[arg(long, env = "USREDIT_LOG", default_value = "info")]
    pub log_level: String,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub credentials_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub theme_path: PathBuf,
    pub keymap_path: PathBuf,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self> {
        let base_url = args.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(simple_error(format!(
                "base url must start with http:// or https://, got {:?}",
                args.base_url
            )));
        }
        Ok(Self {
            base_url,
            credentials_path: args
                .credentials
                .unwrap_or_else(|| config_file_path("credentials.conf")),
            log_file: args.log_file.unwrap_or_else(|| config_file_path("usredit.log")),
            log_level: args.log_level,
            theme_path: config_file_read_path("theme.conf")
                .unwrap_or_else(|| config_file_path("theme.conf")),
            keymap_path: config_file_read_path("keybinds.conf")
                .unwrap_or_else(|| config_file_path("keybinds.conf")),
        })
    }
}

/// Directory for config files: `$XDG_CONFIG_HOME/usredit`, else the working directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Path where `name` should be written. Creates the config directory best-effort.
pub fn config_file_path(name: &str) -> PathBuf {
    let dir = config_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return PathBuf::from(name);
    }
    dir.join(name)
}

/// First existing location of `name`: the config directory, then the working directory.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    [config_dir().join(name), PathBuf::from(name)]
        .into_iter()
        .find(|p| p.exists())
}
