//! Account registration and session handling. Shares the key-value store
//! with the ledger through the `user_accounts` and `session_current_user`
//! keys. Credentials are stored as salted, iterated SHA-256 digests; the
//! plaintext never touches storage.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::storage::{KeyValueStore, SESSION_KEY, USER_ACCOUNTS_KEY};

const SALT_LEN: usize = 16;
const HASH_ROUNDS: u32 = 10_000;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    password_hash: String,
    salt: String,
    pub created_at: DateTime<Utc>,
    pub plan: String,
}

/// Session summary persisted under `session_current_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub plan: String,
}

impl From<&UserAccount> for SessionUser {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            plan: account.plan.clone(),
        }
    }
}

/// Owns the registered accounts and the current session.
pub struct AccountManager {
    users: Vec<UserAccount>,
    storage: Box<dyn KeyValueStore>,
}

impl AccountManager {
    /// Loads the account list; a corrupt snapshot is logged and replaced with
    /// an empty list, matching the ledger's recovery policy.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Result<Self, LedgerError> {
        let users = match storage.get(USER_ACCOUNTS_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<UserAccount>>(&raw) {
                Ok(users) => users,
                Err(err) => {
                    tracing::warn!(%err, "user accounts snapshot is corrupt, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(Self { users, storage })
    }

    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, LedgerError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(LedgerError::Validation(
                "username and email are required".into(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(LedgerError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.users.iter().any(|user| {
            user.username.eq_ignore_ascii_case(username) || user.email.eq_ignore_ascii_case(email)
        }) {
            return Err(LedgerError::Validation(
                "an account with that username or email already exists".into(),
            ));
        }

        let salt = random_salt();
        let account = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password, &salt),
            salt,
            created_at: Utc::now(),
            plan: "free".into(),
        };
        let session = SessionUser::from(&account);
        self.users.push(account);
        self.persist_users()?;
        self.store_session(&session)?;
        tracing::info!(username, "account registered");
        Ok(session)
    }

    /// Signs in by username or email and persists the session summary.
    pub fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, LedgerError> {
        let account = self
            .users
            .iter()
            .find(|user| {
                user.username.eq_ignore_ascii_case(identifier)
                    || user.email.eq_ignore_ascii_case(identifier)
            })
            .filter(|user| verify_password(password, &user.salt, &user.password_hash))
            .ok_or_else(|| LedgerError::Validation("invalid username or password".into()))?;
        let session = SessionUser::from(account);
        self.store_session(&session)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), LedgerError> {
        self.storage.remove(SESSION_KEY)
    }

    /// Returns the signed-in user, if any. A corrupt session entry reads as
    /// signed out.
    pub fn current_user(&self) -> Result<Option<SessionUser>, LedgerError> {
        let Some(raw) = self.storage.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!(%err, "session snapshot is corrupt, treating as signed out");
                Ok(None)
            }
        }
    }

    pub fn accounts(&self) -> &[UserAccount] {
        &self.users
    }

    fn persist_users(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string(&self.users)?;
        self.storage.put(USER_ACCOUNTS_KEY, &json)
    }

    fn store_session(&self, session: &SessionUser) -> Result<(), LedgerError> {
        let json = serde_json::to_string(session)?;
        self.storage.put(SESSION_KEY, &json)
    }
}

fn random_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::digest(format!("{salt}:{password}").as_bytes());
    for _ in 1..HASH_ROUNDS {
        digest = Sha256::digest(digest);
    }
    hex::encode(digest)
}

fn verify_password(password: &str, salt: &str, expected: &str) -> bool {
    // Hashes are hex strings of equal length; plain comparison is fine for a
    // single-user local store.
    hash_password(password, salt) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn open_manager(store: MemoryStore) -> AccountManager {
        AccountManager::open(Box::new(store)).expect("open accounts")
    }

    #[test]
    fn register_then_login_round_trips() {
        let store = MemoryStore::new();
        let mut manager = open_manager(store.clone());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .expect("register");

        let manager = open_manager(store);
        let session = manager.login("asha", "correct horse").expect("login");
        assert_eq!(session.username, "asha");
        assert_eq!(
            manager.current_user().unwrap().as_ref(),
            Some(&session),
            "session must persist"
        );
    }

    #[test]
    fn login_by_email_also_works() {
        let mut manager = open_manager(MemoryStore::new());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .unwrap();
        manager
            .login("ASHA@example.com", "correct horse")
            .expect("email login");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut manager = open_manager(MemoryStore::new());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .unwrap();
        let err = manager
            .login("asha", "wrong horse too")
            .expect_err("wrong password must fail");
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let mut manager = open_manager(MemoryStore::new());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .unwrap();
        let err = manager
            .register("Asha", "other@example.com", "another pass")
            .expect_err("duplicate username must fail");
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let mut manager = open_manager(MemoryStore::new());
        let err = manager
            .register("asha", "asha@example.com", "short")
            .expect_err("short password must fail");
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn logout_clears_the_session() {
        let mut manager = open_manager(MemoryStore::new());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .unwrap();
        manager.logout().unwrap();
        assert!(manager.current_user().unwrap().is_none());
    }

    #[test]
    fn stored_hash_is_salted_and_not_the_plaintext() {
        let mut manager = open_manager(MemoryStore::new());
        manager
            .register("asha", "asha@example.com", "correct horse")
            .unwrap();
        manager
            .register("ravi", "ravi@example.com", "correct horse")
            .unwrap();
        let accounts = manager.accounts();
        assert_ne!(accounts[0].password_hash, accounts[1].password_hash);
        assert!(!accounts[0].password_hash.contains("horse"));
    }
}
