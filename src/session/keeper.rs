//! The self-perpetuating refresh chain

use super::types::{token_expiry, Session};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Lead time before token expiry at which a proactive refresh fires
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// The refresh operation the keeper invokes when a timer fires
#[async_trait]
pub trait RefreshSession: Send + Sync {
    /// Exchange a refresh token for a new session
    async fn refresh_session(&self, refresh_jwt: &str) -> Result<Session>;
}

/// Observable state of a keeper's refresh chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeeperStatus {
    /// No session is being kept alive
    Idle,
    /// A refresh timer is pending
    Scheduled {
        /// When the refresh will fire
        refresh_at: DateTime<Utc>,
    },
    /// A refresh call is in flight
    Refreshing,
    /// A refresh failed and the chain stopped; callers re-authenticate
    Stopped {
        /// Why the chain stopped
        reason: String,
    },
}

/// Keeps a session's access token fresh without caller polling.
///
/// Each call to [`watch`](Self::watch) runs one scheduled-task loop: sleep
/// until `expiry - safety_margin`, refresh, and on success go around again
/// with the new session. Exactly one loop is live per keeper at any instant;
/// watching a new session supersedes (aborts) the previous loop so two
/// refreshes can never race.
///
/// A failed refresh stops the chain without retrying; the failure is
/// observable on the [`status`](Self::status) channel and via a warning log.
/// The loop is not tied to any caller's cancellation: it lives until the
/// session ends and must be torn down with [`shutdown`](Self::shutdown)
/// (dropping the keeper also aborts it).
pub struct SessionKeeper {
    refresher: Arc<dyn RefreshSession>,
    safety_margin: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
    status_tx: watch::Sender<KeeperStatus>,
}

impl SessionKeeper {
    /// Create a keeper with the default safety margin
    pub fn new(refresher: Arc<dyn RefreshSession>) -> Self {
        Self::with_safety_margin(refresher, DEFAULT_SAFETY_MARGIN)
    }

    /// Create a keeper with a custom safety margin
    pub fn with_safety_margin(refresher: Arc<dyn RefreshSession>, safety_margin: Duration) -> Self {
        let (status_tx, _) = watch::channel(KeeperStatus::Idle);
        Self {
            refresher,
            safety_margin,
            task: Mutex::new(None),
            status_tx,
        }
    }

    /// Subscribe to the keeper's state transitions
    pub fn status(&self) -> watch::Receiver<KeeperStatus> {
        self.status_tx.subscribe()
    }

    /// Start (or restart) the refresh chain for `session`.
    ///
    /// Decodes the access token's expiry up front so an undecodable token
    /// surfaces to the caller instead of killing the chain silently. A
    /// non-positive computed delay (clock skew, nearly expired token) fires
    /// the refresh immediately rather than being rejected.
    pub fn watch(&self, session: Session) -> Result<()> {
        token_expiry(&session.access_jwt)?;

        let mut slot = self.task.lock().expect("keeper task lock poisoned");
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(run_chain(
            Arc::clone(&self.refresher),
            self.status_tx.clone(),
            self.safety_margin,
            session,
        )));
        Ok(())
    }

    /// Tear the refresh chain down
    pub fn shutdown(&self) {
        let mut slot = self.task.lock().expect("keeper task lock poisoned");
        if let Some(task) = slot.take() {
            task.abort();
        }
        self.status_tx.send_replace(KeeperStatus::Idle);
    }

    /// Whether a refresh chain is currently live
    pub fn is_watching(&self) -> bool {
        self.task
            .lock()
            .expect("keeper task lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SessionKeeper {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}

impl std::fmt::Debug for SessionKeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeeper")
            .field("safety_margin", &self.safety_margin)
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

async fn run_chain(
    refresher: Arc<dyn RefreshSession>,
    status_tx: watch::Sender<KeeperStatus>,
    safety_margin: Duration,
    mut session: Session,
) {
    loop {
        let expiry = match token_expiry(&session.access_jwt) {
            Ok(expiry) => expiry,
            Err(e) => {
                warn!(error = %e, "refreshed access token is undecodable, chain stopped");
                status_tx.send_replace(KeeperStatus::Stopped {
                    reason: e.to_string(),
                });
                return;
            }
        };

        #[allow(clippy::cast_possible_wrap)]
        let refresh_at = expiry - chrono::Duration::seconds(safety_margin.as_secs() as i64);
        let delay = (refresh_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        status_tx.send_replace(KeeperStatus::Scheduled { refresh_at });
        debug!(%refresh_at, ?delay, "refresh armed");
        tokio::time::sleep(delay).await;

        status_tx.send_replace(KeeperStatus::Refreshing);
        match refresher.refresh_session(&session.refresh_jwt).await {
            Ok(next) => {
                debug!(handle = %next.handle, "session refreshed");
                session = next;
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed, chain stopped");
                status_tx.send_replace(KeeperStatus::Stopped {
                    reason: e.to_string(),
                });
                return;
            }
        }
    }
}
