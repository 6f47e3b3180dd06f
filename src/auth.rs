//! One-shot mock authentication gate.
//!
//! Any non-empty id/password pair is accepted after a fixed verification
//! delay. The state is published on a `watch` channel; the caller-supplied
//! callback is stored as an `Option` and taken on success, so it fires at
//! most once no matter how often `submit` is called.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::ValidationError;

const MISSING_CREDENTIALS: &str = "Please enter both ID and password.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    /// Terminal. There is no logout.
    Authenticated { user_id: String },
}

impl AuthState {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { user_id } => Some(user_id),
            _ => None,
        }
    }
}

type AuthCallback = Box<dyn FnOnce(String) + Send + 'static>;

pub struct AuthGate {
    state: Arc<watch::Sender<AuthState>>,
    /// `None` once fired.
    on_authenticated: Arc<Mutex<Option<AuthCallback>>>,
    verify_delay: Duration,
}

impl AuthGate {
    pub fn new(verify_delay: Duration, on_authenticated: impl FnOnce(String) + Send + 'static) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            state: Arc::new(state),
            on_authenticated: Arc::new(Mutex::new(Some(Box::new(on_authenticated)))),
            verify_delay,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user_id().is_some()
    }

    /// Submit credentials.
    ///
    /// Empty (after trimming) id or password fails and leaves the state
    /// untouched. Once a submit has been accepted, later calls are no-ops.
    pub fn submit(&self, id: &str, password: &str) -> Result<(), ValidationError> {
        if *self.state.borrow() != AuthState::Unauthenticated {
            tracing::debug!("Credentials ignored, authentication already started");
            return Ok(());
        }

        let user_id = id.trim();
        if user_id.is_empty() || password.trim().is_empty() {
            return Err(ValidationError::new(MISSING_CREDENTIALS));
        }

        let started = self.state.send_if_modified(|state| {
            if *state == AuthState::Unauthenticated {
                *state = AuthState::Authenticating;
                true
            } else {
                false
            }
        });
        if !started {
            return Ok(());
        }
        tracing::info!(user_id, "Authenticating");

        let user_id = user_id.to_string();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = Arc::clone(&self.state);
                let callback = Arc::clone(&self.on_authenticated);
                let delay = self.verify_delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    complete(&state, &callback, user_id);
                });
            }
            Err(_) => {
                tracing::warn!("No tokio runtime, skipping verification delay");
                complete(&self.state, &self.on_authenticated, user_id);
            }
        }
        Ok(())
    }

    /// Wait until authenticated and return the user id.
    ///
    /// Returns `None` only if the gate is dropped first.
    pub async fn authenticated(&self) -> Option<String> {
        let mut rx = self.subscribe();
        let state = rx.wait_for(|s| s.user_id().is_some()).await.ok()?;
        state.user_id().map(str::to_string)
    }
}

fn complete(
    state: &watch::Sender<AuthState>,
    callback: &Mutex<Option<AuthCallback>>,
    user_id: String,
) {
    state.send_replace(AuthState::Authenticated {
        user_id: user_id.clone(),
    });
    tracing::info!(user_id = %user_id, "Authenticated");

    let callback = match callback.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => {
            tracing::error!("Auth callback lock poisoned");
            None
        }
    };
    if let Some(callback) = callback {
        callback(user_id);
    }
}
