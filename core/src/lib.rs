/// Chatlink - conversation list synchronization and archival engine
///
/// Maintains a locally cached, ordered, inbox/archived-partitioned view of a
/// user's 1:1 conversations and runs the archive/unarchive, delete, and block
/// mutation protocols against an HTTP backend, with explicit timeout and
/// reconciliation handling.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod transport;
pub mod types;
pub mod view;

pub use cache::ConversationCache;
pub use config::Config;
pub use engine::{ArchiveOutcome, ConfirmPrompt, ConversationEngine};
pub use error::{ChatError, Result};
pub use transport::{ConversationTransport, HttpTransport};
pub use types::{
    Conversation, LastMessage, MessageKind, Notice, Severity, Tab, TabCounts, UserSummary,
};
pub use view::{EmptyReason, ViewState};
