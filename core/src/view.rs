/// View-side session state and the pure cache-to-list projection.
use crate::cache::ConversationCache;
use crate::types::{Conversation, Tab, TabCounts};

/// Why a visible list came out empty, for the empty-state copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The search query matched nothing
    NoMatches,
    /// The partition itself has no conversations
    NoConversations,
}

/// Per-screen session state: created when the screen mounts, dropped when it
/// unmounts, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub query: String,
    /// Conversation currently targeted by the options menu or a mutation
    /// launched from it. At most one; a new target replaces the old one.
    pub selected: Option<String>,
}

impl ViewState {
    pub fn open_options(&mut self, conversation_id: impl Into<String>) {
        self.selected = Some(conversation_id.into());
    }

    pub fn close_options(&mut self) {
        self.selected = None;
    }
}

/// Project the cache into the sequence to render: partition by the active
/// tab, then narrow by the case-insensitive username query. Side-effect-free;
/// recomputing is always safe.
pub fn visible(cache: &ConversationCache, tab: Tab, query: &str) -> Vec<Conversation> {
    let query = query.trim().to_lowercase();
    cache
        .entries()
        .iter()
        .filter(|c| match tab {
            Tab::Inbox => !c.is_archived,
            Tab::Archived => c.is_archived,
        })
        .filter(|c| query.is_empty() || c.user.username.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Badge counts: partition sizes over the full cache, ignoring the query
pub fn tab_counts(cache: &ConversationCache) -> TabCounts {
    let archived = cache.entries().iter().filter(|c| c.is_archived).count();
    TabCounts {
        inbox: cache.len() - archived,
        archived,
    }
}

/// Distinguish "nothing matched the search" from "no conversations yet"
pub fn empty_reason(query: &str) -> EmptyReason {
    if query.trim().is_empty() {
        EmptyReason::NoConversations
    } else {
        EmptyReason::NoMatches
    }
}
