/// Conversation list tests: fetch, ordering, partitioning, and search
use async_trait::async_trait;
use chatlink_core::{
    ChatError, Config, Conversation, ConversationEngine, ConversationTransport, EmptyReason,
    LastMessage, MessageKind, Result as ChatResult, Tab, UserSummary,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn conv(id: &str, username: &str, timestamp: Option<&str>, archived: bool) -> Conversation {
    Conversation {
        id: id.to_string(),
        user: UserSummary {
            id: id.to_string(),
            username: username.to_string(),
            avatar: None,
            is_online: false,
        },
        last_message: timestamp.map(|t| LastMessage {
            id: format!("m-{}", id),
            content: "hello".to_string(),
            sender_id: id.to_string(),
            timestamp: t.to_string(),
            kind: MessageKind::Text,
        }),
        unread_count: 0,
        is_archived: archived,
    }
}

fn ids(list: &[Conversation]) -> Vec<String> {
    list.iter().map(|c| c.id.clone()).collect()
}

/// List-only mock backend; mutations are accepted and ignored
#[derive(Clone)]
struct ListTransport {
    inner: Arc<ListInner>,
}

struct ListInner {
    conversations: Mutex<Vec<Conversation>>,
    fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl ListTransport {
    fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                conversations: Mutex::new(conversations),
                fail: Mutex::new(false),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    fn set_fail(&self, fail: bool) {
        *self.inner.fail.lock().unwrap() = fail;
    }

    fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationTransport for ListTransport {
    async fn list_conversations(&self) -> ChatResult<Vec<Conversation>> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if *self.inner.fail.lock().unwrap() {
            return Err(ChatError::Transport("connection refused".to_string()));
        }
        Ok(self.inner.conversations.lock().unwrap().clone())
    }

    async fn set_archived(&self, _conversation_id: &str) -> ChatResult<Option<bool>> {
        Ok(None)
    }

    async fn delete_conversation(&self, _conversation_id: &str) -> ChatResult<()> {
        Ok(())
    }

    async fn block_user(&self, _username: &str) -> ChatResult<()> {
        Ok(())
    }
}

fn engine_with(conversations: Vec<Conversation>) -> (ConversationEngine<ListTransport>, ListTransport) {
    let transport = ListTransport::new(conversations);
    let engine = ConversationEngine::new(transport.clone(), Config::default());
    (engine, transport)
}

#[tokio::test]
async fn fetch_sorts_by_most_recent_activity() {
    let (engine, _) = engine_with(vec![
        conv("u1", "u1-name", Some("2024-01-01T00:00:00Z"), false),
        conv("u2", "u2-name", Some("2024-02-01T00:00:00Z"), false),
    ]);
    engine.refresh().await;

    assert_eq!(ids(&engine.visible().await), vec!["u2", "u1"]);
}

#[tokio::test]
async fn missing_and_invalid_timestamps_sort_oldest() {
    // b has no last message, c has an unparseable timestamp: both count as
    // epoch zero and keep transport order between themselves
    let (engine, _) = engine_with(vec![
        conv("b", "bea", None, false),
        conv("a", "ada", Some("2024-03-01T12:00:00Z"), false),
        conv("c", "cal", Some("not-a-timestamp"), false),
    ]);
    engine.refresh().await;

    assert_eq!(ids(&engine.visible().await), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn repeated_refresh_is_idempotent() {
    let (engine, transport) = engine_with(vec![
        conv("u1", "alice", Some("2024-01-01T00:00:00Z"), false),
        conv("u2", "bob", Some("2024-02-01T00:00:00Z"), true),
        conv("u3", "carol", None, false),
    ]);
    engine.refresh().await;
    let first = ids(&engine.snapshot().await);
    engine.refresh().await;
    let second = ids(&engine.snapshot().await);

    assert_eq!(first, second);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn partitions_are_disjoint_and_cover_the_cache() {
    let (engine, _) = engine_with(vec![
        conv("u1", "alice", Some("2024-01-01T00:00:00Z"), false),
        conv("u2", "bob", Some("2024-02-01T00:00:00Z"), true),
        conv("u3", "carol", Some("2024-03-01T00:00:00Z"), false),
        conv("u4", "dave", None, true),
    ]);
    engine.refresh().await;

    engine.set_tab(Tab::Inbox).await;
    let inbox = ids(&engine.visible().await);
    engine.set_tab(Tab::Archived).await;
    let archived = ids(&engine.visible().await);

    assert!(inbox.iter().all(|id| !archived.contains(id)));
    let mut union: Vec<String> = inbox.iter().chain(archived.iter()).cloned().collect();
    union.sort();
    let mut all = ids(&engine.snapshot().await);
    all.sort();
    assert_eq!(union, all);

    let counts = engine.tab_counts().await;
    assert_eq!(counts.inbox, 2);
    assert_eq!(counts.archived, 2);
}

#[tokio::test]
async fn search_filters_by_username_case_insensitively() {
    let (engine, _) = engine_with(vec![
        conv("u1", "u1-name", Some("2024-01-01T00:00:00Z"), false),
        conv("u2", "u2-name", Some("2024-02-01T00:00:00Z"), false),
        conv("u3", "Alice", Some("2024-03-01T00:00:00Z"), false),
    ]);
    engine.refresh().await;

    engine.set_query("u1").await;
    assert_eq!(ids(&engine.visible().await), vec!["u1"]);

    engine.set_query("ALI").await;
    assert_eq!(ids(&engine.visible().await), vec!["u3"]);

    engine.set_query("  ").await;
    assert_eq!(engine.visible().await.len(), 3);
}

#[tokio::test]
async fn tab_counts_ignore_the_search_filter() {
    let (engine, _) = engine_with(vec![
        conv("u1", "alice", Some("2024-01-01T00:00:00Z"), false),
        conv("u2", "bob", Some("2024-02-01T00:00:00Z"), true),
    ]);
    engine.refresh().await;
    engine.set_query("nothing-matches-this").await;

    assert!(engine.visible().await.is_empty());
    let counts = engine.tab_counts().await;
    assert_eq!(counts.inbox, 1);
    assert_eq!(counts.archived, 1);
}

#[tokio::test]
async fn failed_fetch_empties_the_cache_without_panicking() {
    let (engine, transport) = engine_with(vec![conv(
        "u1",
        "alice",
        Some("2024-01-01T00:00:00Z"),
        false,
    )]);
    engine.refresh().await;
    assert_eq!(engine.snapshot().await.len(), 1);

    transport.set_fail(true);
    engine.refresh().await;

    assert!(engine.snapshot().await.is_empty());
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn empty_reason_distinguishes_search_from_no_data() {
    let (engine, _) = engine_with(vec![]);
    engine.refresh().await;

    assert_eq!(engine.empty_reason().await, EmptyReason::NoConversations);
    engine.set_query("ghost").await;
    assert_eq!(engine.empty_reason().await, EmptyReason::NoMatches);
}
