//! Auth state - the mocked session lifecycle.

use std::sync::Arc;
use std::time::Duration;

use quill_shared::ActionResult;
use tokio::sync::RwLock;

use crate::domain::User;
use crate::error::DomainError;
use crate::persistence::{JsonStore, USER_KEY};
use crate::ports::{Clock, StoreError};

/// Session state as seen by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Anonymous,
    Loading,
    Authenticated(User),
    Error(String),
}

/// Simulated latency of the auth calls.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub latency: Duration,
    pub logout_latency: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
            logout_latency: Duration::from_millis(300),
        }
    }
}

#[derive(Debug)]
struct AuthState {
    status: AuthStatus,
    last_error: Option<String>,
}

/// Owns the single active session and mirrors it to `blog_app_user`.
pub struct AuthService {
    store: JsonStore,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
    state: RwLock<AuthState>,
}

impl AuthService {
    pub fn new(store: JsonStore, clock: Arc<dyn Clock>, config: AuthConfig) -> Self {
        Self {
            store,
            clock,
            config,
            state: RwLock::new(AuthState {
                status: AuthStatus::Anonymous,
                last_error: None,
            }),
        }
    }

    /// Restore the persisted session, clearing it if it cannot be decoded.
    pub async fn initialize(&self) -> AuthStatus {
        let status = match self.store.try_load::<User>(USER_KEY).await {
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.id, "Restored session");
                AuthStatus::Authenticated(user)
            }
            Ok(None) => AuthStatus::Anonymous,
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(error = %e, "Stored session is corrupt, clearing it");
                // Clearing is best effort: the session is unusable either way.
                let _ = self.store.clear(USER_KEY).await;
                AuthStatus::Anonymous
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored session");
                AuthStatus::Anonymous
            }
        };

        let mut state = self.state.write().await;
        state.status = status.clone();
        state.last_error = None;
        status
    }

    pub async fn login(&self, email: &str, password: &str) -> ActionResult<User> {
        let previous = self.begin().await;
        self.clock.sleep(self.config.latency).await;

        let result = match require_credentials(email, password) {
            Ok(()) => {
                let user = User::login(email.trim(), self.clock.now());
                self.persist(user).await
            }
            Err(e) => Err(e),
        };
        self.settle(previous, result).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> ActionResult<User> {
        let previous = self.begin().await;
        self.clock.sleep(self.config.latency).await;

        let result = match require_credentials(email, password) {
            Ok(()) => {
                let user = User::register(email.trim(), full_name, self.clock.now());
                self.persist(user).await
            }
            Err(e) => Err(e),
        };
        self.settle(previous, result).await
    }

    /// Drop the session. Logging out twice is the same as once.
    pub async fn logout(&self) -> ActionResult<()> {
        let previous = self.begin().await;
        self.clock.sleep(self.config.logout_latency).await;

        let result = self
            .store
            .clear(USER_KEY)
            .await
            .map_err(DomainError::from);

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if matches!(previous, AuthStatus::Authenticated(_)) {
                    tracing::info!("Logged out");
                }
                state.status = AuthStatus::Anonymous;
                state.last_error = None;
                ActionResult::done()
            }
            Err(e) => {
                let message = e.to_string();
                state.status = AuthStatus::Error(message.clone());
                state.last_error = Some(message.clone());
                ActionResult::failure(message)
            }
        }
    }

    pub async fn status(&self) -> AuthStatus {
        self.state.read().await.status.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        match &self.state.read().await.status {
            AuthStatus::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.state.read().await.status, AuthStatus::Authenticated(_))
    }

    /// Message of the most recent failed action, cleared by the next success.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Enter `Loading` and hand back the status to restore on validation failure.
    async fn begin(&self) -> AuthStatus {
        let mut state = self.state.write().await;
        state.last_error = None;
        std::mem::replace(&mut state.status, AuthStatus::Loading)
    }

    async fn persist(&self, user: User) -> Result<User, DomainError> {
        self.store.save(USER_KEY, Some(&user)).await?;
        Ok(user)
    }

    async fn settle(
        &self,
        previous: AuthStatus,
        result: Result<User, DomainError>,
    ) -> ActionResult<User> {
        let mut state = self.state.write().await;
        match &result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, "Session started");
                state.status = AuthStatus::Authenticated(user.clone());
                state.last_error = None;
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Auth action failed");
                state.status = match e {
                    DomainError::Persistence(_) => AuthStatus::Error(message.clone()),
                    _ => previous,
                };
                state.last_error = Some(message);
            }
        }
        ActionResult::from(result)
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(DomainError::validation("Email and password are required"));
    }
    Ok(())
}
