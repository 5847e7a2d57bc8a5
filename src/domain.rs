//! Shared shapes of the chat transcript and the staged upload set.
//!
//! Messages are created locally (user turns, synthetic notices) or from a
//! backend reply, and are never mutated once appended to a transcript.

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Wire name of the role, as the backend expects it in `history`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A document excerpt the backend cited for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Document name (usually the stored file path or name).
    pub name: String,
    /// Page number, when the document is paginated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Excerpt text.
    pub content: String,
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: String,
    role: MessageRole,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<DocumentSource>>,
}

impl Message {
    fn new(role: MessageRole, content: String, sources: Option<Vec<DocumentSource>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Utc::now(),
            sources,
        }
    }

    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), None)
    }

    /// An assistant message, optionally citing sources.
    #[must_use]
    pub fn assistant(content: impl Into<String>, sources: Option<Vec<DocumentSource>>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), sources)
    }

    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content.into(), None)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn role(&self) -> MessageRole {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Cited sources. Always `None` for user and system messages.
    #[must_use]
    pub fn sources(&self) -> Option<&[DocumentSource]> {
        self.sources.as_deref()
    }
}

/// A file the user picked or dropped, held until it is sent for processing.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Original file name as reported by the browser.
    pub name: String,
    /// Size in bytes as received, even when `data` was not retained.
    pub size: u64,
    /// Media type reported by the browser, or guessed from the name.
    pub media_type: String,
    /// File contents. Empty when the file was too large to keep.
    pub data: Bytes,
    /// Display record for the upload list.
    pub record: UploadedDocument,
}

impl StagedFile {
    /// Build a staged file, guessing the media type when none was given.
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: Option<String>, data: Bytes, size: u64) -> Self {
        let name = name.into();
        let media_type = media_type
            .filter(|m| !m.is_empty() && m != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
        let record = UploadedDocument {
            id: Uuid::new_v4().to_string(),
            name: name.clone(),
            media_type: media_type.clone(),
            size,
            upload_date: Utc::now(),
        };
        Self {
            name,
            size,
            media_type,
            data,
            record,
        }
    }

    /// Staged file from in-memory contents.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(name, None, data, size)
    }

    /// Lowercased text after the last `.`; a name without a dot is its own
    /// extension.
    #[must_use]
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Metadata kept for a staged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedDocument {
    pub id: String,
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

/// Read-only snapshot of a session's conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub last_updated: DateTime<Utc>,
}

const TITLE_LIMIT: usize = 48;

impl ChatSession {
    /// Snapshot `messages`, titling the session after its first user turn.
    #[must_use]
    pub fn snapshot(id: impl Into<String>, messages: Vec<Message>) -> Self {
        let title = messages
            .iter()
            .find(|m| m.role() == MessageRole::User)
            .map_or_else(|| "New chat".to_string(), |m| truncate(m.content(), TITLE_LIMIT));
        let last_updated = messages.last().map_or_else(Utc::now, Message::timestamp);
        Self {
            id: id.into(),
            title,
            messages,
            last_updated,
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_roles() {
        assert_eq!(Message::user("hi").role(), MessageRole::User);
        assert_eq!(Message::system("boot").role(), MessageRole::System);

        let source = DocumentSource {
            name: "policy.pdf".into(),
            page: Some(2),
            content: "...".into(),
        };
        let reply = Message::assistant("30 days", Some(vec![source.clone()]));
        assert_eq!(reply.role(), MessageRole::Assistant);
        assert_eq!(reply.sources(), Some(&[source][..]));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("same");
        let b = Message::user("same");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(StagedFile::from_bytes("Report.PDF", "x").extension(), "pdf");
        assert_eq!(StagedFile::from_bytes("archive.tar.gz", "x").extension(), "gz");
        assert_eq!(StagedFile::from_bytes("README", "x").extension(), "readme");
    }

    #[test]
    fn test_media_type_is_guessed_from_name() {
        let file = StagedFile::new("notes.txt", None, Bytes::from_static(b"hi"), 2);
        assert_eq!(file.media_type, "text/plain");

        let file = StagedFile::new(
            "paper.pdf",
            Some("application/octet-stream".into()),
            Bytes::new(),
            0,
        );
        assert_eq!(file.media_type, "application/pdf");
    }

    #[test]
    fn test_session_title_uses_first_user_message() {
        let snapshot = ChatSession::snapshot(
            "s1",
            vec![
                Message::assistant("Ready.", None),
                Message::user("What is the refund policy for annual plans purchased in Europe?"),
            ],
        );
        assert!(snapshot.title.starts_with("What is the refund policy"));
        assert!(snapshot.title.ends_with("..."));

        let empty = ChatSession::snapshot("s2", Vec::new());
        assert_eq!(empty.title, "New chat");
    }
}
