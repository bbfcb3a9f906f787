//! Persisted credential lookup.
//!
//! The bearer token is issued elsewhere and stored in a small `key = value`
//! file. It is read on every call so a token refreshed by another tool is
//! picked up by the next request without restarting.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Context, Result};

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "Token";

/// Read-only access to persisted credentials.
pub trait CredentialProvider {
    fn get(&self, key: &str) -> Option<String>;

    /// The current bearer token, if one is stored.
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
    }
}

/// Credentials backed by a `key = value` file, re-read on every lookup.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every entry in the file.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        let contents = std::fs::read_to_string(&self.path)
            .with_ctx(|| format!("read credentials {}", self.path.display()))?;
        Ok(parse_entries(&contents))
    }
}

impl CredentialProvider for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(err) => {
                tracing::warn!(error = %err, "credential store unavailable");
                None
            }
        }
    }
}

/// In-memory credentials, mostly for tests and one-off runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentials {
    entries: HashMap<String, String>,
}

impl MemoryCredentials {
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(TOKEN_KEY.to_string(), token.into());
        Self { entries }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl CredentialProvider for MemoryCredentials {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

fn parse_entries(contents: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, '=');
        let key = parts.next().map(|s| s.trim()).unwrap_or("");
        let val = parts.next().map(|s| s.trim()).unwrap_or("");
        if key.is_empty() || val.is_empty() {
            continue;
        }
        out.insert(key.to_string(), val.to_string());
    }
    out
}
