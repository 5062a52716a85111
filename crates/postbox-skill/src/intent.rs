//! Utterance classification: the closed command set of the skill.

/// Trigger prefixes. Matching is literal and case-sensitive — this is the
/// capitalization the platform transcribes commands with.
const SEND_TRIGGER: &str = "Отправь";
const READ_TRIGGER: &str = "Прочитай";
const REGISTER_TRIGGER: &str = "Зарегистрируй";

/// The classified meaning of one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Send `body` to the user registered under `recipient`.
    Send { recipient: String, body: String },
    /// Read the message at a 1-based position in the caller's unread list.
    Read { ordinal: usize },
    /// Claim `username` for the calling platform user.
    Register { username: String },
    /// Anything else; answered with the caller's unread count.
    Unknown,
}

/// Classifies an utterance into an [`Intent`].
///
/// Pure and total: every string yields some intent, and any text matching a
/// trigger prefix yields that trigger's variant with arguments extracted by
/// the rules below. Unmatched text is [`Intent::Unknown`], never an error.
pub fn classify(utterance: &str) -> Intent {
    if let Some(rest) = utterance.strip_prefix(SEND_TRIGGER) {
        // recipient = first whitespace-separated token, body = the rest;
        // either may come out empty
        let rest = rest.trim_start();
        let (recipient, body) = match rest.split_once(char::is_whitespace) {
            Some((name, body)) => (name, body.trim_start()),
            None => (rest, ""),
        };
        return Intent::Send {
            recipient: recipient.to_string(),
            body: body.to_string(),
        };
    }

    if let Some(rest) = utterance.strip_prefix(READ_TRIGGER) {
        // a bare "Прочитай", or one with an unparseable ordinal, reads the
        // first message
        let ordinal = rest
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse().ok())
            .unwrap_or(1);
        return Intent::Read { ordinal };
    }

    if let Some(rest) = utterance.strip_prefix(REGISTER_TRIGGER) {
        let username = rest.split_whitespace().next().unwrap_or_default();
        return Intent::Register {
            username: username.to_string(),
        };
    }

    Intent::Unknown
}
