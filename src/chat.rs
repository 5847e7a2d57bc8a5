//! Chat interface state: transcript, draft input, staged files and the
//! send workflow for both modes.
//!
//! A send runs in three phases so callers holding the interface behind a lock
//! never keep it across the network call:
//!
//! 1. [`ChatInterface::begin_send`] validates, updates the transcript and
//!    raises the loading flag, returning a [`PendingRequest`].
//! 2. [`PendingRequest::dispatch`] performs the single backend call.
//! 3. [`ChatInterface::complete`] applies the [`Settled`] result and always
//!    lowers the loading flag.
//!
//! While loading, `begin_send` refuses with [`SendRejected::Busy`], so at most
//! one request is in flight per interface. A request whose result never
//! arrives is settled with [`Settled::interrupted`].

use crate::backend::{BackendError, DocumentBackend};
use crate::domain::{Message, StagedFile};
use crate::notice::Notice;
use crate::upload::{FileUpload, UploadError, UploadPolicy};

/// Which panel the interface shows. Selected by the page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    #[default]
    Chat,
    Upload,
}

impl ChatMode {
    #[must_use]
    pub fn from_upload_flag(upload: bool) -> Self {
        if upload { Self::Upload } else { Self::Chat }
    }

    #[must_use]
    pub fn is_upload(self) -> bool {
        self == Self::Upload
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Chat => Self::Upload,
            Self::Upload => Self::Chat,
        }
    }

    /// Chat page URL for this mode.
    #[must_use]
    pub fn page_path(self) -> &'static str {
        match self {
            Self::Chat => "/chat",
            Self::Upload => "/chat?upload=true",
        }
    }
}

/// Why a send did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// A request is already in flight.
    Busy,
    /// Chat mode with a blank draft.
    EmptyInput,
    /// Upload mode with nothing staged.
    NoDocuments,
}

/// Work handed to the backend, detached from the interface.
#[derive(Debug, Clone)]
pub enum PendingRequest {
    Query {
        query: String,
        history: Vec<Message>,
    },
    Documents {
        files: Vec<StagedFile>,
    },
}

/// Result of a dispatched request.
#[derive(Debug)]
pub enum Settled {
    Answer(Result<Message, BackendError>),
    Processed {
        count: usize,
        result: Result<bool, BackendError>,
    },
}

impl Settled {
    /// Failure for a request in `mode` that ended without a result.
    #[must_use]
    pub fn interrupted(mode: ChatMode, reason: impl Into<String>) -> Self {
        let error = BackendError::Other(reason.into());
        match mode {
            ChatMode::Chat => Self::Answer(Err(error)),
            ChatMode::Upload => Self::Processed {
                count: 0,
                result: Err(error),
            },
        }
    }
}

/// What a completed send did, for the caller to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Answered,
    AnswerFailed,
    /// Documents were processed; the caller should leave upload mode.
    DocumentsProcessed,
    ProcessingFailed,
    Rejected(SendRejected),
}

impl SendOutcome {
    /// Mode to show after this outcome, starting from `mode`.
    #[must_use]
    pub fn next_mode(self, mode: ChatMode) -> ChatMode {
        match self {
            Self::DocumentsProcessed => ChatMode::Chat,
            _ => mode,
        }
    }
}

impl PendingRequest {
    /// Perform the backend call.
    pub async fn dispatch(self, backend: &dyn DocumentBackend) -> Settled {
        match self {
            Self::Query { query, history } => {
                Settled::Answer(backend.generate_response(&query, &history).await)
            }
            Self::Documents { files } => Settled::Processed {
                count: files.len(),
                result: backend.process_documents(&files).await,
            },
        }
    }
}

/// Per-session chat interface.
#[derive(Debug)]
pub struct ChatInterface {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    upload: FileUpload,
    notices: Vec<Notice>,
}

impl Default for ChatInterface {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

impl ChatInterface {
    #[must_use]
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            loading: false,
            upload: FileUpload::new(policy),
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn staged_files(&self) -> &[StagedFile] {
        self.upload.files()
    }

    #[must_use]
    pub fn upload_policy(&self) -> &UploadPolicy {
        self.upload.policy()
    }

    /// Whether the send control is enabled.
    #[must_use]
    pub fn can_send(&self, mode: ChatMode) -> bool {
        !self.loading && (mode.is_upload() || !self.input.trim().is_empty())
    }

    /// Take the notices queued since the last render.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn pending_notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Add a batch of files through the upload widget.
    ///
    /// Returns the new staged count. Rejections are also queued as notices.
    pub fn stage_files(&mut self, batch: Vec<StagedFile>) -> Result<usize, UploadError> {
        if batch.is_empty() {
            return Ok(self.upload.len());
        }

        let added = batch.len();
        match self.upload.add(batch) {
            Ok(files) => {
                let total = files.len();
                tracing::debug!(added, total, "Staged files");
                self.notices
                    .push(Notice::success(format!("{added} file(s) added successfully.")));
                self.files_changed();
                Ok(total)
            }
            Err(e) => {
                tracing::debug!(reason = %e, "Rejected file batch");
                self.notices.push(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Remove the staged file at `index`.
    pub fn remove_file(&mut self, index: usize) -> Option<StagedFile> {
        let removed = self.upload.remove(index)?;
        self.notices.push(Notice::info("File removed."));
        self.files_changed();
        Some(removed)
    }

    fn files_changed(&mut self) {
        let count = self.upload.len();
        if count > 0 {
            self.notices.push(Notice::success(format!(
                "{count} document(s) ready for processing."
            )));
        }
    }

    /// Start a send in `mode`.
    pub fn begin_send(&mut self, mode: ChatMode) -> Result<PendingRequest, SendRejected> {
        if self.loading {
            self.notices.push(Notice::info(
                "Still working on the previous request. Please wait.",
            ));
            return Err(SendRejected::Busy);
        }

        match mode {
            ChatMode::Upload => {
                if self.upload.is_empty() {
                    self.notices
                        .push(Notice::error("Please upload at least one document first."));
                    return Err(SendRejected::NoDocuments);
                }
                self.loading = true;
                Ok(PendingRequest::Documents {
                    files: self.upload.files().to_vec(),
                })
            }
            ChatMode::Chat => {
                let query = self.input.trim().to_string();
                if query.is_empty() {
                    return Err(SendRejected::EmptyInput);
                }
                let history = self.messages.clone();
                self.messages.push(Message::user(query.clone()));
                self.input.clear();
                self.loading = true;
                Ok(PendingRequest::Query { query, history })
            }
        }
    }

    /// Apply a settled request and clear the loading flag.
    pub fn complete(&mut self, settled: Settled) -> SendOutcome {
        self.loading = false;

        match settled {
            Settled::Answer(Ok(message)) => {
                self.messages.push(message);
                SendOutcome::Answered
            }
            Settled::Answer(Err(e)) => {
                tracing::error!(error = %e, "Error sending message");
                self.notices
                    .push(Notice::error("Error getting response. Please try again."));
                SendOutcome::AnswerFailed
            }
            Settled::Processed {
                count,
                result: Ok(true),
            } => {
                self.messages.push(Message::assistant(
                    format!(
                        "I've processed {count} document(s) and they're ready for querying. \
                         You can now ask me questions about their content."
                    ),
                    None,
                ));
                self.notices
                    .push(Notice::success("Documents processed successfully!"));
                self.upload.clear();
                SendOutcome::DocumentsProcessed
            }
            Settled::Processed { result, .. } => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Error processing files");
                }
                self.notices
                    .push(Notice::error("Error processing documents. Please try again."));
                SendOutcome::ProcessingFailed
            }
        }
    }

    /// Run a whole send against `backend`.
    pub async fn send(&mut self, mode: ChatMode, backend: &dyn DocumentBackend) -> SendOutcome {
        let pending = match self.begin_send(mode) {
            Ok(p) => p,
            Err(reason) => return SendOutcome::Rejected(reason),
        };
        let settled = pending.dispatch(backend).await;
        self.complete(settled)
    }
}
