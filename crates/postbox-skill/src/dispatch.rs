//! Per-request business rules: one classified utterance in, one spoken
//! reply (or a transport status code) out.

use axum::http::StatusCode;
use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use postbox_db::models::MessageSummary;
use postbox_db::{MailboxStore, StoreError};
use postbox_types::api::SkillRequest;

use crate::intent::{self, Intent};
use crate::replies;

/// Runs the store calls and business rules for one request.
///
/// Everything a user can act on becomes a successful spoken reply; only
/// faults the platform caused (or unrecoverable store failures) map to a
/// status code. Store calls are blocking — run this off the async runtime.
pub fn dispatch(store: &dyn MailboxStore, req: &SkillRequest) -> Result<String, StatusCode> {
    let caller = req.session.user.user_id.as_str();

    match intent::classify(&req.request.command) {
        Intent::Send { recipient, body } => {
            let recipient_id = match store.find_recipient(&recipient) {
                Ok(id) => id,
                Err(StoreError::NotFound) => {
                    debug!("no user registered under username {recipient:?}");
                    return Ok(replies::UNKNOWN_RECIPIENT.to_string());
                }
                Err(err) => {
                    debug!("cannot find recipient by username: {err}");
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
            };

            if let Err(err) = store.save_message(&recipient_id, caller, &body) {
                debug!("cannot save message for {recipient_id}: {err}");
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
            Ok(replies::MESSAGE_SENT.to_string())
        }

        Intent::Read { ordinal } => {
            let summaries = list_messages(store, caller)?;

            // spoken ordinals are 1-based; 0 and past-the-end are both misses
            let Some(summary) = ordinal.checked_sub(1).and_then(|i| summaries.get(i)) else {
                return Ok(replies::NO_SUCH_MESSAGE.to_string());
            };

            let message = store.get_message(summary.id).map_err(|err| {
                debug!("cannot load message {}: {err}", summary.id);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            Ok(replies::message_read(
                &message.sender,
                &spoken_time(&message.sent_at),
                &message.payload,
            ))
        }

        Intent::Register { username } => match store.register_user(caller, &username) {
            Ok(()) => Ok(replies::registered(&username)),
            Err(StoreError::Conflict) => Ok(replies::NAME_TAKEN.to_string()),
            Err(err) => {
                debug!("cannot register user: {err}");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },

        Intent::Unknown => {
            let summaries = list_messages(store, caller)?;
            let mut text = if summaries.is_empty() {
                replies::NO_NEW_MESSAGES.to_string()
            } else {
                replies::new_message_count(summaries.len())
            };

            // greet the first turn of a session with the caller's local time
            if req.session.new {
                let tz: Tz = req.timezone.parse().map_err(|_| {
                    debug!("cannot parse timezone {:?}", req.timezone);
                    StatusCode::BAD_REQUEST
                })?;
                let now = Utc::now().with_timezone(&tz);
                text = replies::time_greeting(now.hour(), now.minute(), &text);
            }
            Ok(text)
        }
    }
}

fn list_messages(
    store: &dyn MailboxStore,
    user_id: &str,
) -> Result<Vec<MessageSummary>, StatusCode> {
    store.list_messages(user_id).map_err(|err| {
        debug!("cannot load messages for user: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Formats a stored RFC 3339 timestamp for speech. An unparseable value is
/// spoken as stored.
fn spoken_time(sent_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(sent_at)
        .map(|t| t.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|_| sent_at.to_string())
}
