//! Auth Session Manager
//!
//! Startup runs in two phases: the cached user is shown immediately, then the
//! backend is asked who is signed in. The backend answer always wins and the
//! cache is rewritten or cleared to match it.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;

use crate::domain::{ClientError, SessionGateway};
use crate::models::UserSession;
use crate::services::preferences::PreferenceStore;
use crate::validation::{LoginForm, SignupForm};

/// Coarse status shown in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    Checking,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    /// Cached user restored, not yet checked with the backend
    Cached(UserSession),
    /// Backend check in flight; carries the cached user if there was one
    Verifying(Option<UserSession>),
    Authenticated(UserSession),
}

/// Pure session state machine; every transition can be driven on its own
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    phase: SessionPhase,
}

impl SessionMachine {
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            SessionPhase::Anonymous => SessionStatus::Anonymous,
            SessionPhase::Cached(_) | SessionPhase::Verifying(_) => SessionStatus::Checking,
            SessionPhase::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    /// User to display; the optimistic cached copy counts while checking
    pub fn user(&self) -> Option<&UserSession> {
        match &self.phase {
            SessionPhase::Anonymous | SessionPhase::Verifying(None) => None,
            SessionPhase::Cached(user)
            | SessionPhase::Verifying(Some(user))
            | SessionPhase::Authenticated(user) => Some(user),
        }
    }

    pub fn restore(&mut self, cached: Option<UserSession>) {
        self.phase = match cached {
            Some(user) => SessionPhase::Cached(user),
            None => SessionPhase::Anonymous,
        };
    }

    pub fn begin_verify(&mut self) {
        let cached = match std::mem::take(&mut self.phase) {
            SessionPhase::Cached(user) | SessionPhase::Authenticated(user) => Some(user),
            SessionPhase::Verifying(cached) => cached,
            SessionPhase::Anonymous => None,
        };
        self.phase = SessionPhase::Verifying(cached);
    }

    /// Apply the backend's answer, discarding whatever was cached
    pub fn resolve(&mut self, server: Option<UserSession>) {
        self.phase = match server {
            Some(user) => SessionPhase::Authenticated(user),
            None => SessionPhase::Anonymous,
        };
    }

    pub fn sign_in(&mut self, user: UserSession) {
        self.phase = SessionPhase::Authenticated(user);
    }

    pub fn sign_out(&mut self) {
        self.phase = SessionPhase::Anonymous;
    }
}

pub struct AuthManager {
    gateway: Arc<dyn SessionGateway>,
    preferences: PreferenceStore,
    machine: Mutex<SessionMachine>,
}

impl AuthManager {
    pub fn new(gateway: Arc<dyn SessionGateway>, preferences: PreferenceStore) -> Self {
        Self {
            gateway,
            preferences,
            machine: Mutex::new(SessionMachine::default()),
        }
    }

    fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.machine.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn status(&self) -> SessionStatus {
        self.machine().status()
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine().phase().clone()
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.machine().user().cloned()
    }

    /// Show the cached user, then let the backend decide
    pub async fn bootstrap(&self) -> SessionStatus {
        let cached = self.preferences.load_session();
        if let Some(user) = &cached {
            tracing::debug!("Restored cached session for {}", user.email);
        }
        {
            let mut machine = self.machine();
            machine.restore(cached);
            machine.begin_verify();
        }

        let server = match self.gateway.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Session check failed: {}", e);
                None
            }
        };

        let persisted = match &server {
            Some(user) => self.preferences.save_session(user),
            None => self.preferences.clear_session(),
        };
        if let Err(e) = persisted {
            tracing::error!("Failed to sync session cache: {}", e);
        }

        let mut machine = self.machine();
        machine.resolve(server);
        tracing::info!("Session resolved: {:?}", machine.status());
        machine.status()
    }

    pub async fn login(&self, form: &LoginForm) -> Result<UserSession, ClientError> {
        form.validate()?;

        let user = self
            .gateway
            .login(&form.to_request())
            .await
            .map_err(Self::surface)?
            .with_extra("rememberMe", form.remember_me)
            .with_extra("loginTime", Utc::now().to_rfc3339());

        self.establish(user)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<UserSession, ClientError> {
        form.validate()?;

        let user = self
            .gateway
            .signup(&form.to_request())
            .await
            .map_err(Self::surface)?
            .with_extra("signupTime", Utc::now().to_rfc3339());

        self.establish(user)
    }

    /// Local state is only cleared once the backend confirms
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Err(e) = self.gateway.logout().await {
            tracing::warn!("Logout failed, keeping session: {}", e);
            return Err(e);
        }

        if let Err(e) = self.preferences.clear_session() {
            tracing::error!("Failed to clear session cache: {}", e);
        }
        self.machine().sign_out();
        tracing::info!("Signed out");
        Ok(())
    }

    fn establish(&self, user: UserSession) -> Result<UserSession, ClientError> {
        if let Err(e) = self.preferences.save_session(&user) {
            tracing::error!("Failed to cache session: {}", e);
        }
        tracing::info!("Signed in as {}", user.email);
        self.machine().sign_in(user.clone());
        Ok(user)
    }

    fn surface(e: ClientError) -> ClientError {
        match e {
            ClientError::Server { .. } => {
                tracing::info!("Backend refused credentials: {}", e);
                e
            }
            other => {
                tracing::warn!("Auth request failed: {}", other);
                other
            }
        }
    }
}
