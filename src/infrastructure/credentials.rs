use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainError;
use crate::domain::identity::Role;
use crate::domain::ports::CredentialProvider;

struct Account {
    password: String,
    role: Role,
}

/// Plain-text credential table held in memory.
///
/// Not hardened in any way: passwords are stored and compared as-is.
pub struct InMemoryCredentials {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// The stock table: `admin/admin123` (admin) and `user/user123` (user).
    pub fn with_defaults() -> Self {
        let accounts = [
            ("admin", "admin123", Role::Admin),
            ("user", "user123", Role::User),
        ]
        .into_iter()
        .map(|(username, password, role)| {
            (
                username.to_string(),
                Account {
                    password: password.to_string(),
                    role,
                },
            )
        })
        .collect();

        Self {
            accounts: RwLock::new(accounts),
        }
    }
}

impl Default for InMemoryCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for InMemoryCredentials {
    async fn verify(&self, username: &str, password: &str) -> Option<Role> {
        let accounts = self.accounts.read().await;
        accounts
            .get(username)
            .filter(|account| account.password == password)
            .map(|account| account.role)
    }

    async fn register(&self, username: &str, password: &str, role: Role) -> Result<(), DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput(
                "username and password must not be empty".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(DomainError::UsernameTaken(username.to_string()));
        }
        accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                role,
            },
        );
        Ok(())
    }
}
