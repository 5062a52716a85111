use serde::{Deserialize, Serialize};

/// Request type tag for a plain transcribed utterance. Other request types
/// (button presses, account linking) are not supported by this skill.
pub const TYPE_SIMPLE_UTTERANCE: &str = "SimpleUtterance";

/// Dialog protocol version echoed back in every response.
pub const PROTOCOL_VERSION: &str = "1.0";

// -- Request --

/// One webhook call from the assistant platform. The platform sends more
/// envelope fields than these; unknown fields are ignored on decode.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRequest {
    /// IANA timezone of the speaker, e.g. "Europe/Moscow".
    #[serde(default)]
    pub timezone: String,
    pub request: UtteranceRequest,
    pub session: Session,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UtteranceRequest {
    #[serde(rename = "type")]
    pub kind: String,
    /// What the user said, as transcribed by the platform.
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// True on the first turn of a conversation.
    #[serde(default)]
    pub new: bool,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    /// Opaque platform-assigned identifier of the speaker.
    pub user_id: String,
}

// -- Response --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillResponse {
    pub response: ResponsePayload,
    pub version: String,
}

/// The part of the response the assistant reads aloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub text: String,
}

impl SkillResponse {
    /// Wraps a spoken reply into the platform envelope.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            response: ResponsePayload { text: text.into() },
            version: PROTOCOL_VERSION.to_string(),
        }
    }
}
