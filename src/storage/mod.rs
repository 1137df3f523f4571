pub mod json_backend;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key under which the invoice collection snapshot is persisted.
pub const INVOICE_LEDGER_KEY: &str = "invoice_ledger";
/// Key under which registered user accounts are persisted.
pub const USER_ACCOUNTS_KEY: &str = "user_accounts";
/// Key holding the current session's user summary, when signed in.
pub const SESSION_KEY: &str = "session_current_user";

/// Abstraction over persistence backends capable of storing JSON-encoded
/// snapshots under well-known keys. Values are written wholesale; there are
/// no partial or incremental updates.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::{JsonFileStore, MemoryStore};
