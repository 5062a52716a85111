use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::models::{MessageRecord, MessageSummary};
use crate::{MailboxStore, StoreError};

/// In-memory reference implementation of [`MailboxStore`].
///
/// Honors the same contract as the SQLite store — ascending-id ordering,
/// `Conflict` on registration races, `NotFound` on a missing recipient — so
/// dispatcher tests can run against it without a database file.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    // platform id -> username
    users: HashMap<String, String>,
    messages: Vec<StoredMessage>,
    next_id: i64,
}

struct StoredMessage {
    id: i64,
    sender: String,
    recipient: String,
    payload: String,
    sent_at: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Storage(format!("store lock poisoned: {e}")))
    }
}

impl Inner {
    fn display_name(&self, sender_id: &str) -> String {
        self.users
            .get(sender_id)
            .cloned()
            .unwrap_or_else(|| sender_id.to_string())
    }
}

impl MailboxStore for MemoryStore {
    fn find_recipient(&self, username: &str) -> Result<String, StoreError> {
        let inner = self.lock()?;
        inner
            .users
            .iter()
            .find(|(_, name)| name.as_str() == username)
            .map(|(id, _)| id.clone())
            .ok_or(StoreError::NotFound)
    }

    fn list_messages(&self, user_id: &str) -> Result<Vec<MessageSummary>, StoreError> {
        let inner = self.lock()?;
        // messages are appended with increasing ids, so insertion order is
        // already the required ordering
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.recipient == user_id)
            .map(|m| MessageSummary {
                id: m.id,
                sender: inner.display_name(&m.sender),
                sent_at: m.sent_at.clone(),
            })
            .collect())
    }

    fn get_message(&self, id: i64) -> Result<MessageRecord, StoreError> {
        let inner = self.lock()?;
        inner
            .messages
            .iter()
            .find(|m| m.id == id)
            .map(|m| MessageRecord {
                id: m.id,
                sender: inner.display_name(&m.sender),
                payload: m.payload.clone(),
                sent_at: m.sent_at.clone(),
            })
            .ok_or(StoreError::NotFound)
    }

    fn save_message(
        &self,
        recipient_id: &str,
        sender_id: &str,
        payload: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if !inner.users.contains_key(recipient_id) {
            return Err(StoreError::NotFound);
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.messages.push(StoredMessage {
            id,
            sender: sender_id.to_string(),
            recipient: recipient_id.to_string(),
            payload: payload.to_string(),
            sent_at: Utc::now().to_rfc3339(),
        });
        Ok(())
    }

    fn register_user(&self, user_id: &str, username: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let taken = inner.users.contains_key(user_id)
            || inner.users.values().any(|name| name == username);
        if taken {
            return Err(StoreError::Conflict);
        }
        inner.users.insert(user_id.to_string(), username.to_string());
        Ok(())
    }
}
