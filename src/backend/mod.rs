//! Client side of the external document backend.
//!
//! The backend does all of the real work (parsing, embedding, retrieval and
//! generation). This crate only needs two operations from it, expressed by
//! the [`DocumentBackend`] trait so the transport can be swapped out:
//!
//! - [`DocumentBackend::process_documents`]: `POST /process-documents`
//! - [`DocumentBackend::generate_response`]: `POST /chat`
//!
//! [`HttpBackend`] is the reqwest implementation used in production.

pub mod error;
mod http;

pub use error::{BackendError, Result};
pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DocumentSource, Message, MessageRole, StagedFile};

/// The two calls the chat interface makes against the backend.
///
/// Each call is a single attempt: no retry, timeout or backoff.
#[async_trait]
pub trait DocumentBackend: Send + Sync + std::fmt::Debug {
    /// Submit files for ingestion. Returns the backend's success flag.
    async fn process_documents(&self, files: &[StagedFile]) -> Result<bool>;

    /// Ask a question with the prior transcript as context.
    ///
    /// Returns a fresh assistant [`Message`] carrying the answer and any
    /// cited sources.
    async fn generate_response(&self, query: &str, history: &[Message]) -> Result<Message>;
}

/// Role/content projection of a transcript entry, as sent in `history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub history: Vec<HistoryEntry>,
}

impl ChatRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, history: &[Message]) -> Self {
        Self {
            query: query.into(),
            history: history.iter().map(HistoryEntry::from).collect(),
        }
    }
}

/// Success body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<DocumentSource>>,
}

impl ChatReply {
    /// Turn the reply into a new assistant message.
    #[must_use]
    pub fn into_message(self) -> Message {
        Message::assistant(self.response, self.sources)
    }
}

/// Success body of `POST /process-documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body of either endpoint.
///
/// The processing endpoint reports `message`, the chat endpoint `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The first non-empty message field.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|m| !m.trim().is_empty())
    }
}
