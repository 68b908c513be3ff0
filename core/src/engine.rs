/// Fetch and mutation coordinator for the conversation list.
///
/// Owns the cache and view state for one messaging-screen session and runs
/// the archive/unarchive, delete, and block protocols against the transport.
/// Clones share the same session, which lets spawned tasks (the delayed
/// reconciliation refresh) reach back into it.
use crate::cache::ConversationCache;
use crate::config::Config;
use crate::transport::ConversationTransport;
use crate::types::{Conversation, Notice, Tab, TabCounts};
use crate::view::{self, EmptyReason, ViewState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

/// Terminal state of one archive-toggle attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The server confirmed within the timeout; `archived` is authoritative
    Confirmed { archived: bool },
    /// The timeout fired first; `assumed` is the locally applied guess,
    /// unconfirmed server-side
    TimedOut { assumed: bool },
    /// The transport reported a non-timeout failure; nothing changed
    Failed,
    /// Another toggle was already pending; this call was ignored
    AlreadyPending,
    /// The id matched no cache entry; nothing to do
    UnknownConversation,
}

/// Confirmation prompt for a destructive action. The host UI renders it and
/// calls the matching `confirm_*` only on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub destructive: bool,
}

/// Conversation list engine for one screen session
pub struct ConversationEngine<T: ConversationTransport> {
    transport: Arc<T>,
    config: Config,
    cache: Arc<RwLock<ConversationCache>>,
    view: Arc<RwLock<ViewState>>,
    /// Global pending marker: at most one archive toggle in flight
    archiving: Arc<AtomicBool>,
    loading: Arc<AtomicBool>,
    events: broadcast::Sender<Notice>,
}

impl<T: ConversationTransport> Clone for ConversationEngine<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            cache: self.cache.clone(),
            view: self.view.clone(),
            archiving: self.archiving.clone(),
            loading: self.loading.clone(),
            events: self.events.clone(),
        }
    }
}

impl<T: ConversationTransport> ConversationEngine<T> {
    pub fn new(transport: T, config: Config) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            transport: Arc::new(transport),
            config,
            cache: Arc::new(RwLock::new(ConversationCache::new())),
            view: Arc::new(RwLock::new(ViewState::default())),
            archiving: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    /// Subscribe to user-facing notices (toast severity + title + detail)
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.events.subscribe()
    }

    fn notify(&self, notice: Notice) {
        debug!(severity = ?notice.severity, title = %notice.title, "notice");
        // No subscribers is fine; notices are fire-and-forget
        let _ = self.events.send(notice);
    }

    // ─── Fetch ───────────────────────────────────────────────────────────────

    /// Replace the cache with a fresh server snapshot. A transport failure
    /// empties the cache and logs the error; it never propagates.
    pub async fn refresh(&self) {
        self.loading.store(true, Ordering::SeqCst);
        match self.transport.list_conversations().await {
            Ok(fetched) => {
                info!(count = fetched.len(), "loaded conversations");
                self.cache.write().await.replace(fetched);
            }
            Err(e) => {
                error!("failed to load conversations: {}", e);
                self.cache.write().await.clear();
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// True while a refresh is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// True while an archive toggle is in flight, for UI disabling
    pub fn is_archiving(&self) -> bool {
        self.archiving.load(Ordering::SeqCst)
    }

    // ─── View state ──────────────────────────────────────────────────────────

    pub async fn set_tab(&self, tab: Tab) {
        self.view.write().await.tab = tab;
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.view.write().await.query = query.into();
    }

    /// Target a conversation with the options menu. Returns false for an
    /// unknown id; a known id replaces any previous target.
    pub async fn open_options(&self, conversation_id: &str) -> bool {
        if self.cache.read().await.get(conversation_id).is_none() {
            return false;
        }
        self.view.write().await.open_options(conversation_id);
        true
    }

    pub async fn close_options(&self) {
        self.view.write().await.close_options();
    }

    /// The conversation currently targeted by the options menu, if any
    pub async fn selected(&self) -> Option<String> {
        self.view.read().await.selected.clone()
    }

    // ─── Projection ──────────────────────────────────────────────────────────

    /// The sequence to render under the current tab and query
    pub async fn visible(&self) -> Vec<Conversation> {
        let cache = self.cache.read().await;
        let view = self.view.read().await;
        view::visible(&cache, view.tab, &view.query)
    }

    /// Badge counts over the full cache, ignoring the query
    pub async fn tab_counts(&self) -> TabCounts {
        view::tab_counts(&*self.cache.read().await)
    }

    /// Why an empty `visible()` result is empty, for the empty-state copy
    pub async fn empty_reason(&self) -> EmptyReason {
        view::empty_reason(&self.view.read().await.query)
    }

    /// Full cache contents in rendered order
    pub async fn snapshot(&self) -> Vec<Conversation> {
        self.cache.read().await.entries().to_vec()
    }

    // ─── Archive / unarchive ─────────────────────────────────────────────────

    /// Archive or unarchive one conversation, optimistically reconciled.
    ///
    /// At most one toggle is in flight across the whole list; a call while
    /// another is pending is silently ignored. The request races a fixed
    /// timeout: a confirmed response patches the cache with the server's
    /// authoritative flag and schedules a reconciliation refresh, a timeout
    /// flips the flag locally without confirmation, and a response arriving
    /// after the timeout branch already ran is discarded.
    pub async fn toggle_archive(&self, conversation_id: &str) -> ArchiveOutcome {
        if self
            .archiving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(id = %conversation_id, "archive toggle ignored: another one is pending");
            return ArchiveOutcome::AlreadyPending;
        }

        // Snapshot the target and drop any options menu pointing at it so
        // nothing can re-target the conversation mid-flight
        let snapshot = self.cache.read().await.get(conversation_id).cloned();
        self.view.write().await.close_options();

        let snapshot = match snapshot {
            Some(c) => c,
            None => {
                self.archiving.store(false, Ordering::SeqCst);
                warn!(id = %conversation_id, "archive toggle ignored: unknown conversation");
                return ArchiveOutcome::UnknownConversation;
            }
        };

        let prior = snapshot.is_archived;
        let id = snapshot.id.clone();

        // Spawned so that a timeout leaves the request running detached;
        // dropping the join handle does not cancel the task and its eventual
        // result is then discarded
        let request = {
            let transport = self.transport.clone();
            let id = id.clone();
            tokio::spawn(async move { transport.set_archived(&id).await })
        };

        let outcome = match tokio::time::timeout(self.config.archive_timeout, request).await {
            Ok(Ok(Ok(flag))) => {
                // The server is the source of truth; never assume the call
                // flipped the prior local value. An omitted flag falls back
                // to the inverted snapshot.
                let archived = flag.unwrap_or(!prior);
                self.cache.write().await.set_archived(&id, archived);
                info!(id = %id, archived, "archive toggle confirmed");
                if archived {
                    self.notify(Notice::success("Success", "Conversation archived"));
                } else {
                    self.notify(Notice::success("Success", "Conversation unarchived"));
                }
                self.schedule_reconcile();
                ArchiveOutcome::Confirmed { archived }
            }
            Ok(Ok(Err(e))) => {
                error!(id = %id, "archive toggle failed: {}", e);
                self.notify(Notice::error("Error", "Could not process the request"));
                ArchiveOutcome::Failed
            }
            Ok(Err(e)) => {
                error!(id = %id, "archive task aborted: {}", e);
                self.notify(Notice::error("Error", "Could not process the request"));
                ArchiveOutcome::Failed
            }
            Err(_elapsed) => {
                // No confirmation in time: apply the optimistic guess locally
                let assumed = !prior;
                self.cache.write().await.set_archived(&id, assumed);
                warn!(id = %id, assumed, "archive toggle timed out, applied locally");
                self.notify(Notice::info(
                    "Notice",
                    "Change applied locally. Check your connection.",
                ));
                ArchiveOutcome::TimedOut { assumed }
            }
        };

        // Unconditional, so one failed attempt never blocks the next
        self.archiving.store(false, Ordering::SeqCst);
        outcome
    }

    /// Re-fetch shortly after a confirmed mutation so concurrent server-side
    /// changes (another client archiving, for example) are picked up
    fn schedule_reconcile(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(engine.config.reconcile_delay).await;
            engine.refresh().await;
        });
    }

    // ─── Delete ──────────────────────────────────────────────────────────────

    /// Confirmation prompt for deleting; no request is issued here
    pub async fn delete_prompt(&self, conversation_id: &str) -> Option<ConfirmPrompt> {
        let cache = self.cache.read().await;
        let c = cache.get(conversation_id)?;
        Some(ConfirmPrompt {
            title: "Delete Conversation".to_string(),
            message: format!(
                "Are you sure you want to delete the conversation with @{}? This removes it only for you.",
                c.user.username
            ),
            confirm_label: "Delete".to_string(),
            destructive: true,
        })
    }

    /// Issue the delete after the host UI confirmed. Success removes the
    /// entry by id; failure leaves the cache untouched.
    pub async fn confirm_delete(&self, conversation_id: &str) -> bool {
        match self.transport.delete_conversation(conversation_id).await {
            Ok(()) => {
                self.cache.write().await.remove(conversation_id);
                self.view.write().await.close_options();
                info!(id = %conversation_id, "conversation deleted");
                self.notify(Notice::success("Success", "Conversation deleted for you"));
                true
            }
            Err(e) => {
                error!(id = %conversation_id, "failed to delete conversation: {}", e);
                self.notify(Notice::error("Error", "Could not delete the conversation"));
                false
            }
        }
    }

    // ─── Block ───────────────────────────────────────────────────────────────

    /// Confirmation prompt for blocking the counterpart
    pub async fn block_prompt(&self, conversation_id: &str) -> Option<ConfirmPrompt> {
        let cache = self.cache.read().await;
        let c = cache.get(conversation_id)?;
        Some(ConfirmPrompt {
            title: "Block User".to_string(),
            message: format!("Are you sure you want to block @{}?", c.user.username),
            confirm_label: "Block".to_string(),
            destructive: true,
        })
    }

    /// Block the counterpart after confirmation. Never mutates the cache:
    /// blocking is a relationship-level effect, and a later full refresh
    /// reflects any visibility change it causes.
    pub async fn confirm_block(&self, conversation_id: &str) -> bool {
        let username = match self.cache.read().await.get(conversation_id) {
            Some(c) => c.user.username.clone(),
            None => return false,
        };
        match self.transport.block_user(&username).await {
            Ok(()) => {
                self.view.write().await.close_options();
                info!(user = %username, "user blocked");
                self.notify(Notice::success("Success", "User blocked"));
                true
            }
            Err(e) => {
                error!(user = %username, "failed to block user: {}", e);
                self.notify(Notice::error("Error", "Could not block the user"));
                false
            }
        }
    }
}
