//! Conversation message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Number of characters of the first message shown in a conversation summary
pub const SUMMARY_SNIPPET_CHARS: usize = 30;

/// Role of a conversation turn. Closed set: any other value is rejected
/// at the data-model boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The asking user
    User,
    /// The generated answer
    Assistant,
}

impl Role {
    /// Stable string form used in storage and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(Error::invalid_request(format!(
                "unknown message role '{}' (expected 'user' or 'assistant')",
                other
            ))),
        }
    }
}

/// Validated conversation session identifier.
///
/// Only version-4 UUIDs are accepted; anything else is rejected before the
/// store or index is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Parse and validate a session id string
    pub fn parse(value: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(value).map_err(|_| {
            Error::invalid_session_id(format!("'{}' is not a valid UUID", value))
        })?;
        if uuid.get_version_num() != 4 {
            return Err(Error::invalid_session_id(format!(
                "session id must be a version-4 UUID, got version {}",
                uuid.get_version_num()
            )));
        }
        Ok(Self(uuid))
    }

    /// Generate a fresh session id
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identity
    pub id: i64,
    /// Owning tenant/user
    pub owner_id: String,
    /// Conversation this turn belongs to
    pub session_id: Uuid,
    /// Who produced the turn
    pub role: Role,
    /// Message text
    pub content: String,
    /// Creation timestamp (UTC, monotonically increasing within a session)
    pub timestamp: DateTime<Utc>,
}

/// Ordered view of one session's messages, reconstructed per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

/// One row per distinct session owned by a user: the earliest message's
/// role and timestamp plus a short snippet of its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub session_id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationSummary {
    /// Truncate message content to the summary snippet length
    pub fn snippet(content: &str) -> String {
        content.chars().take(SUMMARY_SNIPPET_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_values() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
    }

    #[test]
    fn role_rejects_unknown_values() {
        assert!("system".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("User".parse::<Role>().is_err());
    }

    #[test]
    fn session_id_accepts_v4() {
        let id = SessionId::parse("11111111-1111-4111-8111-111111111111").unwrap();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn session_id_rejects_v1() {
        // Version nibble is 1
        let err = SessionId::parse("11111111-1111-1111-8111-111111111111").unwrap_err();
        assert!(matches!(err, Error::InvalidSessionId(_)));
    }

    #[test]
    fn session_id_rejects_garbage() {
        let err = SessionId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, Error::InvalidSessionId(_)));
    }

    #[test]
    fn snippet_truncates_to_thirty_chars() {
        let long = "x".repeat(100);
        let snippet = ConversationSummary::snippet(&long);
        assert_eq!(snippet.chars().count(), SUMMARY_SNIPPET_CHARS);
    }

    #[test]
    fn snippet_keeps_short_content_unchanged() {
        assert_eq!(ConversationSummary::snippet("hello"), "hello");
    }
}
