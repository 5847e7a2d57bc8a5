//! LangRAG web client
//!
//! A server-rendered web client for a document question-answering backend
//! built on retrieval-augmented generation (RAG). Users stage documents, send
//! them for processing, then chat with an assistant whose answers cite the
//! documents they came from.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving HTML pages and form posts
//!   (post/redirect/get), progressively enhanced with HTMX
//! - **Backend client**: the [`backend::DocumentBackend`] trait and its
//!   reqwest-based HTTP implementation
//! - **Sessions**: one in-memory [`chat::ChatInterface`] per browser cookie
//!
//! # Modules
//!
//! - [`backend`]: external document backend (process documents, chat)
//! - [`chat`]: chat interface state machine and send workflow
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`domain`]: messages, sources, staged files
//! - [`notice`]: flash notifications
//! - [`server`]: router, handlers, startup
//! - [`session`]: per-browser session store
//! - [`ui`]: HTML rendering
//! - [`upload`]: staged-file list and validation

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod backend;
pub mod chat;
pub mod config;
pub mod domain;
pub mod notice;
pub mod server;
pub mod session;
pub mod ui;
pub mod upload;

use std::sync::Arc;

use crate::backend::DocumentBackend;
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Per-browser chat sessions.
    pub sessions: SessionStore,
    /// Document backend used by every session.
    pub backend: Arc<dyn DocumentBackend>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state with an empty session store using the configured upload policy.
    #[must_use]
    pub fn new(config: Arc<AppConfig>, backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            sessions: SessionStore::new(config.upload.policy()),
            backend,
            config,
        }
    }
}
