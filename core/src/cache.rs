/// In-memory conversation cache, the single source of truth for rendering.
/// Rebuilt wholesale on fetch, patched in place on mutation. Owned by the
/// engine for the lifetime of the messaging screen; nothing else writes here.
use crate::types::Conversation;

/// Ordered collection of conversation records for the session. The stored
/// order is the rendered order: descending by last activity, ties in the
/// order the transport returned them.
#[derive(Debug, Default, Clone)]
pub struct ConversationCache {
    entries: Vec<Conversation>,
}

impl ConversationCache {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the whole cache with a fresh snapshot, sorting it into
    /// rendered order. The sort is stable, so entries with equal activity
    /// instants (including the epoch-zero fallback) keep transport order.
    pub fn replace(&mut self, mut fetched: Vec<Conversation>) {
        fetched.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        self.entries = fetched;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Patch one entry's archived flag by id. Returns false for an unknown id.
    pub fn set_archived(&mut self, id: &str, value: bool) -> bool {
        match self.entries.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.is_archived = value;
                true
            }
            None => false,
        }
    }

    /// Remove one entry by id. Returns true if an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|c| c.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in rendered order
    pub fn entries(&self) -> &[Conversation] {
        &self.entries
    }
}
