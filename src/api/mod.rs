//! Client side of the users backend.
//!
//! [`UserApi`] is the seam the dialog and the list screen talk to;
//! [`HttpUserApi`] is the production implementation over `reqwest`, and
//! [`worker::ApiWorker`] moves calls off the event loop thread.

pub mod models;
pub mod worker;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use reqwest::header::AUTHORIZATION;

pub use crate::error::ApiError;
pub use models::{User, UserUpdate};

/// Operations against the users backend.
///
/// `token` is the raw bearer credential as read from the credential store at
/// call time. `None` is still sent, as an empty bearer value.
pub trait UserApi: Send + Sync {
    fn list_users(&self, token: Option<&str>) -> Result<Vec<User>, ApiError>;
    fn update_user(&self, id: &str, update: &UserUpdate, token: Option<&str>)
    -> Result<(), ApiError>;
}

/// `UserApi` over HTTP with a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: Client,
    base_url: Url,
}

impl HttpUserApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ApiError::InvalidUrl {
            url: trimmed.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: trimmed.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        let client = Client::builder()
            .user_agent(concat!("usredit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                url: trimmed.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base path, percent-encoding each one.
    ///
    /// Dot segments are rejected: the url crate drops them on push, which
    /// would address a different resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: format!("path segment {bad:?} is not allowed"),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn user_url(&self, id: &str) -> Result<Url, ApiError> {
        self.endpoint(&["users", id])
    }
}

fn bearer(token: Option<&str>) -> String {
    format!("Bearer {}", token.unwrap_or_default())
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping the body for the log.
fn ensure_success(url: &str, resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(ApiError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

impl UserApi for HttpUserApi {
    fn list_users(&self, token: Option<&str>) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["users"])?;
        tracing::debug!(%url, "listing users");
        let resp = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, bearer(token))
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        ensure_success(url.as_str(), resp)?
            .json::<Vec<User>>()
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.user_url(id)?;
        tracing::debug!(%url, "updating user");
        let resp = self
            .client
            .put(url.clone())
            .header(AUTHORIZATION, bearer(token))
            .json(update)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        ensure_success(url.as_str(), resp)?;
        Ok(())
    }
}
