/// Shared types for the conversation list engine
use serde::{Deserialize, Serialize};

/// One 1:1 conversation thread, as listed by the server.
///
/// The id equals the counterpart user's id (the backend keys conversations
/// by the other participant, not by a separate conversation entity) and is
/// the sole key for cache lookup, diffing, and mutation targeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id")]
    pub id: String,
    /// The counterpart
    pub user: UserSummary,
    #[serde(rename = "lastMessage", default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    #[serde(rename = "unreadCount", default)]
    pub unread_count: u32,
    #[serde(rename = "isArchived", default)]
    pub is_archived: bool,
}

impl Conversation {
    /// Activity instant in epoch milliseconds, taken from the last message.
    /// No last message, or a timestamp that does not parse as RFC3339,
    /// counts as 0 so the entry sorts oldest instead of erroring.
    pub fn last_activity(&self) -> i64 {
        self.last_message
            .as_ref()
            .and_then(|m| chrono::DateTime::parse_from_rfc3339(&m.timestamp).ok())
            .map(|t| t.timestamp_millis())
            .unwrap_or(0)
    }
}

/// Counterpart user summary carried on each conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "isOnline", default)]
    pub is_online: bool,
}

/// Preview of the most recent message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    /// RFC3339 timestamp as received from the server
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

/// Content kind of a message preview; servers that omit the field mean text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Document,
}

/// The two partitions of the conversation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Inbox,
    Archived,
}

/// Badge counts per partition, computed over the full cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TabCounts {
    pub inbox: usize,
    pub archived: usize,
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Transient notification handed to the host UI's toast mechanism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            detail: detail.into(),
        }
    }
}
