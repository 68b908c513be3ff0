/// Network boundary: the four operations the engine issues against the
/// conversation service, plus the reqwest-backed implementation.
///
/// Routes:
///   GET    /api/messages/conversations
///   PUT    /api/messages/conversations/:id/archive
///   DELETE /api/messages/conversations/:id
///   POST   /api/blocks                 body: {"targetUsername":"..."}
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::types::Conversation;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

/// The calls the engine needs. Implementations return normalized, typed
/// results; no untyped payload crosses this boundary.
#[async_trait]
pub trait ConversationTransport: Send + Sync + 'static {
    /// Full conversation snapshot for the authenticated user (no pagination)
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Toggle the archived flag server-side. Returns the authoritative
    /// resulting value, or `None` when the server confirmed the toggle
    /// without echoing the flag. Toggles again on every call.
    async fn set_archived(&self, conversation_id: &str) -> Result<Option<bool>>;

    /// Delete the conversation for the calling user only
    async fn delete_conversation(&self, conversation_id: &str) -> Result<()>;

    /// Block the counterpart by username
    async fn block_user(&self, username: &str) -> Result<()>;
}

/// Service response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ChatError::Transport(
                self.error
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ArchivePayload {
    #[serde(rename = "isArchived", default)]
    is_archived: Option<bool>,
}

/// HTTPS transport against the messaging service
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        })
    }

    /// Attach a bearer credential to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "transport request");
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[async_trait]
impl ConversationTransport for HttpTransport {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let resp = self
            .request(Method::GET, "/api/messages/conversations")
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse<Vec<Conversation>>>()
            .await?;
        // A missing or null data array normalizes to an empty list
        Ok(resp.into_result()?.unwrap_or_default())
    }

    async fn set_archived(&self, conversation_id: &str) -> Result<Option<bool>> {
        let path = format!("/api/messages/conversations/{}/archive", conversation_id);
        let resp = self
            .request(Method::PUT, &path)
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse<ArchivePayload>>()
            .await?;
        Ok(resp.into_result()?.and_then(|p| p.is_archived))
    }

    async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        let path = format!("/api/messages/conversations/{}", conversation_id);
        let resp = self
            .request(Method::DELETE, &path)
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse<serde_json::Value>>()
            .await?;
        resp.into_result().map(|_| ())
    }

    async fn block_user(&self, username: &str) -> Result<()> {
        let resp = self
            .request(Method::POST, "/api/blocks")
            .json(&serde_json::json!({ "targetUsername": username }))
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse<serde_json::Value>>()
            .await?;
        resp.into_result().map(|_| ())
    }
}
