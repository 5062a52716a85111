pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

use crate::models::{MessageRecord, MessageSummary};

pub use memory::MemoryStore;

/// Store-level failure kinds. The dispatcher branches on these; it never
/// sees engine-specific error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced user or message does not exist.
    #[error("no matching record")]
    NotFound,
    /// The username is already taken.
    #[error("username already taken")]
    Conflict,
    /// Any other persistence failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            err => StoreError::Storage(err.to_string()),
        }
    }
}

/// Persistence capability of the skill: users keyed by their platform id,
/// plus the messages addressed to them.
///
/// All operations are synchronous and atomic from the caller's point of
/// view. Implementations must return a recipient's messages in a stable,
/// ascending-id order so a spoken ordinal resolves to the same message the
/// caller was just told about.
pub trait MailboxStore: Send + Sync {
    /// Resolves a registered username to the owner's platform id.
    fn find_recipient(&self, username: &str) -> Result<String, StoreError>;

    /// Summaries of the messages addressed to `user_id`, oldest first.
    /// Summaries never carry the payload text.
    fn list_messages(&self, user_id: &str) -> Result<Vec<MessageSummary>, StoreError>;

    /// Loads one message by its store-assigned id.
    fn get_message(&self, id: i64) -> Result<MessageRecord, StoreError>;

    /// Persists a new message, stamping `sent_at` with the server clock.
    fn save_message(
        &self,
        recipient_id: &str,
        sender_id: &str,
        payload: &str,
    ) -> Result<(), StoreError>;

    /// Claims `username` for `user_id`. `Conflict` when the name is taken.
    fn register_user(&self, user_id: &str, username: &str) -> Result<(), StoreError>;
}

/// SQLite-backed [`MailboxStore`]. The query implementations live in
/// [`queries`].
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private throwaway database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("DB lock poisoned: {e}")))?;
        f(&conn)
    }
}
