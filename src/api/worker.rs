//! Background thread that carries API calls for the event loop.
//!
//! The loop never blocks on the network: it hands an [`ApiJob`] to the worker
//! and drains [`ApiReply`] values on each tick. Jobs run one at a time in the
//! order they were sent.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use super::{ApiError, User, UserApi};
use crate::app::edit_user::UpdateRequest;

/// Work for the API thread. Tokens are read by the sender at call time.
#[derive(Clone, Debug)]
pub enum ApiJob {
    ListUsers { token: Option<String> },
    UpdateUser(UpdateRequest),
}

#[derive(Debug)]
pub enum ApiReply {
    Users(Result<Vec<User>, ApiError>),
    Updated {
        request: UpdateRequest,
        result: Result<(), ApiError>,
    },
}

/// Run one job to completion against `api`.
pub fn execute(api: &dyn UserApi, job: ApiJob) -> ApiReply {
    match job {
        ApiJob::ListUsers { token } => ApiReply::Users(api.list_users(token.as_deref())),
        ApiJob::UpdateUser(request) => {
            let result = api.update_user(&request.user_id, &request.update, request.token.as_deref());
            ApiReply::Updated { request, result }
        }
    }
}

pub struct ApiWorker {
    jobs: Sender<ApiJob>,
    replies: Receiver<ApiReply>,
}

impl ApiWorker {
    /// Spawn the worker thread. It exits once this handle is dropped.
    pub fn spawn(api: Arc<dyn UserApi>) -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<ApiJob>();
        let (reply_tx, reply_rx) = mpsc::channel::<ApiReply>();
        thread::Builder::new()
            .name("usredit-api".to_string())
            .spawn(move || {
                for job in job_rx {
                    let reply = execute(api.as_ref(), job);
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                tracing::debug!("api worker stopped");
            })?;
        Ok(Self {
            jobs: job_tx,
            replies: reply_rx,
        })
    }

    /// Queue a job. Hands the job back if the worker thread is gone.
    pub fn send(&self, job: ApiJob) -> Result<(), ApiJob> {
        self.jobs.send(job).map_err(|e| e.0)
    }

    pub fn try_recv(&self) -> Option<ApiReply> {
        self.replies.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ApiReply> {
        self.replies.recv_timeout(timeout).ok()
    }
}
