/// Rows returned across the store boundary. The `sender` field is a display
/// name: the sender's registered username, or their raw platform id when
/// they never registered one.

/// Unread-list entry. Deliberately payload-free: the list is only used to
/// resolve a spoken ordinal to a message id.
#[derive(Debug, Clone)]
pub struct MessageSummary {
    pub id: i64,
    pub sender: String,
    pub sent_at: String,
}

/// A full message as read back for speech.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: i64,
    pub sender: String,
    pub payload: String,
    pub sent_at: String,
}
