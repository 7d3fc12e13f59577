// ── Console state machine ──
//
// Presentation state for the gateway console: authentication, the gateway
// list, the selected gateway, an editable copy, per-control busy flags, and
// pending notifications. All network calls go through a `ConsoleBackend`.
// State sits behind a short-lived lock that is never held across an await.

mod notification;
mod refresh;

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use serde_json::Value;
use strum::Display;
use tracing::{debug, info, warn};

use crate::convert::gateways_from_listing;
use crate::model::{EditableField, Gateway};
use crate::proxy::{CreateReply, LoginReply};

pub use notification::{Notification, NotificationLevel};

use refresh::RefreshSequencer;

// ── Backend seam ─────────────────────────────────────────────────────

/// A failed backend call: the HTTP status (when one was received) and the
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// The three proxy calls the console makes. The session lives in the
/// backend (a cookie jar for the HTTP implementation).
pub trait ConsoleBackend: Send + Sync {
    fn login(
        &self,
        api_key: &SecretString,
        domain: &str,
    ) -> impl Future<Output = Result<LoginReply, RemoteError>> + Send;

    /// The raw listing body, `{ "objects": [...], ... }`.
    fn list_gateways(&self) -> impl Future<Output = Result<Value, RemoteError>> + Send;

    fn create_gateway(
        &self,
        gateway: &Gateway,
    ) -> impl Future<Output = Result<CreateReply, RemoteError>> + Send;
}

// ── State types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated {
        domain: String,
    },
}

/// A user-facing control that can have a call in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Control {
    Login,
    Refresh,
    Save,
}

/// What happened to a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// A newer refresh had already been applied; this response (or its
    /// failure) was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("{control} is already in progress")]
    Busy { control: Control },

    #[error("no gateway selected")]
    NothingSelected,

    #[error("unknown gateway: {uid}")]
    UnknownGateway { uid: String },

    #[error("no gateway copy to edit")]
    NoDraft,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Default)]
struct ConsoleState {
    auth: AuthState,
    gateways: Vec<Gateway>,
    selected: Option<Gateway>,
    draft: Option<Gateway>,
    in_flight: HashSet<Control>,
    refresh: RefreshSequencer,
    notifications: Vec<Notification>,
}

impl ConsoleState {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

// ── Console ──────────────────────────────────────────────────────────

pub struct Console<B> {
    backend: B,
    state: Mutex<ConsoleState>,
}

impl<B: ConsoleBackend> Console<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(ConsoleState::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, control: Control) -> Result<BusyGuard<'_>, ConsoleError> {
        let mut state = self.lock();
        if !state.in_flight.insert(control) {
            debug!(%control, "rejecting duplicate submission");
            return Err(ConsoleError::Busy { control });
        }
        Ok(BusyGuard {
            state: &self.state,
            control,
        })
    }

    fn require_auth(&self) -> Result<(), ConsoleError> {
        match self.lock().auth {
            AuthState::Authenticated { .. } => Ok(()),
            AuthState::Unauthenticated => Err(ConsoleError::NotAuthenticated),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Authenticate, then load the gateway list.
    ///
    /// A rejected login leaves the console unauthenticated. If the login
    /// succeeds but the follow-up listing fails, the console stays
    /// authenticated and the listing error is returned. The listing runs
    /// under the login control, so a user refresh in flight does not block it.
    pub async fn login(
        &self,
        api_key: &SecretString,
        domain: &str,
    ) -> Result<RefreshOutcome, ConsoleError> {
        let guard = self.acquire(Control::Login)?;
        let result = self.backend.login(api_key, domain).await;

        let reply = {
            let mut state = self.lock();
            match result {
                Ok(reply) => {
                    state.auth = AuthState::Authenticated {
                        domain: reply.domain.clone(),
                    };
                    state.notify(Notification::success(
                        "Authentication successful",
                        format!("Connected to domain: {}", reply.domain),
                    ));
                    reply
                }
                Err(err) => {
                    state.notify(Notification::error("Authentication failed", &err.message));
                    return Err(err.into());
                }
            }
        };

        info!(domain = %reply.domain, "console authenticated");
        let outcome = self.refresh_inner().await;
        drop(guard);
        outcome
    }

    /// Reload the gateway list.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ConsoleError> {
        self.require_auth()?;
        let _guard = self.acquire(Control::Refresh)?;
        self.refresh_inner().await
    }

    async fn refresh_inner(&self) -> Result<RefreshOutcome, ConsoleError> {
        let ticket = self.lock().refresh.issue();
        let result = self.backend.list_gateways().await;

        let mut state = self.lock();
        match result {
            Ok(body) => {
                if !state.refresh.accept(ticket) {
                    debug!(?ticket, "discarding stale gateway list");
                    return Ok(RefreshOutcome::Stale);
                }
                let gateways = gateways_from_listing(&body);
                let count = gateways.len();
                let selected = state
                    .selected
                    .as_ref()
                    .and_then(|sel| gateways.iter().find(|g| g.uid == sel.uid).cloned());
                state.selected = selected;
                state.gateways = gateways;
                state.notify(Notification::success(
                    "Gateways loaded",
                    format!("Successfully loaded {count} gateway objects"),
                ));
                Ok(RefreshOutcome::Applied { count })
            }
            Err(err) => {
                if state.refresh.is_superseded(ticket) {
                    debug!(?ticket, error = %err, "ignoring failure of superseded gateway list");
                    return Ok(RefreshOutcome::Stale);
                }
                state.notify(Notification::error("Failed to load gateways", &err.message));
                Err(err.into())
            }
        }
    }

    /// Select a listed gateway; discards any copy in progress.
    pub fn select(&self, uid: &str) -> Result<Gateway, ConsoleError> {
        let mut state = self.lock();
        let gateway = state
            .gateways
            .iter()
            .find(|g| g.uid == uid)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownGateway {
                uid: uid.to_owned(),
            })?;
        state.selected = Some(gateway.clone());
        state.draft = None;
        Ok(gateway)
    }

    /// Derive an editable copy of the selected gateway. No network.
    pub fn create_copy(&self) -> Result<Gateway, ConsoleError> {
        let mut state = self.lock();
        let copy = state
            .selected
            .as_ref()
            .map(Gateway::to_copy)
            .ok_or(ConsoleError::NothingSelected)?;
        state.draft = Some(copy.clone());
        state.notify(Notification::info(
            "Gateway copied",
            "You can now edit the copy before saving",
        ));
        Ok(copy)
    }

    /// Change one field of the copy in memory.
    pub fn edit(&self, field: EditableField, value: impl Into<String>) -> Result<(), ConsoleError> {
        let mut state = self.lock();
        let draft = state.draft.as_mut().ok_or(ConsoleError::NoDraft)?;
        draft.set_field(field, value);
        Ok(())
    }

    /// Submit the copy, then reload the list.
    ///
    /// Save stays busy until the reload finishes. The copy is kept after
    /// saving so it can be adjusted and saved again.
    pub async fn save(&self) -> Result<CreateReply, ConsoleError> {
        self.require_auth()?;
        let draft = self.lock().draft.clone().ok_or(ConsoleError::NoDraft)?;
        let guard = self.acquire(Control::Save)?;

        let result = self.backend.create_gateway(&draft).await;
        let reply = {
            let mut state = self.lock();
            match result {
                Ok(reply) => {
                    if reply.published {
                        state.notify(Notification::success(
                            "Gateway created",
                            format!("Successfully created gateway: {}", draft.name),
                        ));
                    } else {
                        warn!(uid = %reply.uid, "gateway saved but not published");
                        state.notify(Notification::warning(
                            "Gateway created but not published",
                            reply.publish_error.clone().unwrap_or_else(|| reply.message.clone()),
                        ));
                    }
                    reply
                }
                Err(err) => {
                    state.notify(Notification::error("Failed to create gateway", &err.message));
                    return Err(err.into());
                }
            }
        };

        if let Err(err) = self.refresh_inner().await {
            warn!(error = %err, "list refresh after save failed");
        }
        drop(guard);
        Ok(reply)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn auth_state(&self) -> AuthState {
        self.lock().auth.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.lock().auth, AuthState::Authenticated { .. })
    }

    pub fn gateways(&self) -> Vec<Gateway> {
        self.lock().gateways.clone()
    }

    pub fn selected(&self) -> Option<Gateway> {
        self.lock().selected.clone()
    }

    pub fn draft(&self) -> Option<Gateway> {
        self.lock().draft.clone()
    }

    /// `true` while any call is in flight.
    pub fn is_busy(&self) -> bool {
        !self.lock().in_flight.is_empty()
    }

    pub fn is_control_busy(&self, control: Control) -> bool {
        self.lock().in_flight.contains(&control)
    }

    /// Drain pending notifications, oldest first.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }
}

/// Clears a control's busy flag when its call finishes, however it ends.
struct BusyGuard<'a> {
    state: &'a Mutex<ConsoleState>,
    control: Control,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.control);
    }
}
