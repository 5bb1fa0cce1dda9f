use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::identity::{Identity, Role, View};
use crate::domain::ports::CredentialProvider;

/// Checks credentials through a pluggable [`CredentialProvider`].
pub struct IdentityProvider<C> {
    credentials: C,
}

impl<C: CredentialProvider> IdentityProvider<C> {
    pub fn new(credentials: C) -> Self {
        Self { credentials }
    }

    /// `None` on any mismatch; unknown user and wrong password look the same.
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        let role = self.credentials.verify(username, password).await?;
        Some(Identity {
            username: username.to_string(),
            role,
        })
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, DomainError> {
        self.credentials.register(username, password, role).await?;
        log::info!("Registered {} as {}", username, role);
        Ok(Identity {
            username: username.to_string(),
            role,
        })
    }
}

/// Who is logged in, from login until logout.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn login<C: CredentialProvider>(
        &mut self,
        provider: &IdentityProvider<C>,
        username: &str,
        password: &str,
    ) -> Result<Identity, DomainError> {
        let identity = provider
            .authenticate(username, password)
            .await
            .ok_or(DomainError::AuthenticationFailed)?;
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    pub fn current(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn clear(&mut self) {
        self.identity = None;
    }

    pub fn can_access(&self, view: View) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.can_access(view))
    }
}

/// Sessions idle for longer than this are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct LiveSession {
    session: Session,
    last_seen: Instant,
}

/// Live sessions keyed by bearer token. Nothing survives a restart.
///
/// A session expires once unused for `idle_ttl`; every successful lookup
/// renews it. Expired entries are purged on each login.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, LiveSession>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Logs in and returns the token of the new session.
    pub async fn open<C: CredentialProvider>(
        &self,
        provider: &IdentityProvider<C>,
        username: &str,
        password: &str,
    ) -> Result<(Uuid, Identity), DomainError> {
        let mut session = Session::new();
        let identity = session.login(provider, username, password).await?;
        let token = Uuid::new_v4();

        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, live| now.duration_since(live.last_seen) < self.idle_ttl);
        if sessions.len() < before {
            log::debug!("Purged {} idle session(s)", before - sessions.len());
        }
        sessions.insert(
            token,
            LiveSession {
                session,
                last_seen: now,
            },
        );
        Ok((token, identity))
    }

    pub async fn current(&self, token: Uuid) -> Option<Identity> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let live = sessions.get_mut(&token)?;
        if now.duration_since(live.last_seen) >= self.idle_ttl {
            sessions.remove(&token);
            return None;
        }
        live.last_seen = now;
        live.session.current().cloned()
    }

    /// Ends the session. Returns whether the token was live.
    pub async fn close(&self, token: Uuid) -> bool {
        match self.sessions.write().await.remove(&token) {
            Some(mut live) => {
                live.session.clear();
                true
            }
            None => false,
        }
    }

    /// Number of sessions held, expired ones included until the next purge.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
