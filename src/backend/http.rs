//! HTTP implementation of [`DocumentBackend`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use super::error::{BackendError, Result};
use super::{ChatReply, ChatRequest, DocumentBackend, ErrorBody, ProcessReply};
use crate::domain::{Message, StagedFile};

/// reqwest client for the document backend.
///
/// # Example
///
/// ```rust,no_run
/// use langrag_web::backend::{DocumentBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:5000/api")?;
/// let answer = backend.generate_response("What is the refund policy?", &[]).await?;
/// println!("{}", answer.content());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client rooted at `api_url` (e.g. `http://localhost:5000/api`).
    pub fn new(api_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(api_url, reqwest::Client::new())
    }

    /// Create a backend client with a custom reqwest client.
    pub fn with_client(api_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut raw = api_url.as_ref().trim().to_string();
        // Url::join replaces the last segment unless the base ends with '/'.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)?;
        Ok(Self { base_url, http })
    }

    /// Base URL every endpoint is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| fallback.to_string());
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_documents(&self, files: &[StagedFile]) -> Result<bool> {
        let mut form = Form::new();
        for (index, file) in files.iter().enumerate() {
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.name.clone())
                .mime_str(&file.media_type)?;
            form = form.part(format!("file_{index}"), part);
        }

        let response = self
            .http
            .post(self.endpoint("process-documents")?)
            .multipart(form)
            .send()
            .await?;
        let reply: ProcessReply =
            Self::handle_response(response, "Failed to process documents").await?;
        Ok(reply.success)
    }

    async fn send_query(&self, query: &str, history: &[Message]) -> Result<Message> {
        let request = ChatRequest::new(query, history);
        let response = self
            .http
            .post(self.endpoint("chat")?)
            .json(&request)
            .send()
            .await?;
        let reply: ChatReply =
            Self::handle_response(response, "Failed to generate response").await?;
        Ok(reply.into_message())
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn process_documents(&self, files: &[StagedFile]) -> Result<bool> {
        tracing::debug!(file_count = files.len(), "Submitting documents for processing");
        self.send_documents(files).await.inspect_err(|e| {
            tracing::error!(error = %e, status = ?e.status(), "Error processing documents");
        })
    }

    async fn generate_response(&self, query: &str, history: &[Message]) -> Result<Message> {
        tracing::debug!(
            query_length = query.len(),
            history_length = history.len(),
            "Requesting generated response"
        );
        self.send_query(query, history).await.inspect_err(|e| {
            tracing::error!(error = %e, status = ?e.status(), "Error generating response");
        })
    }
}
