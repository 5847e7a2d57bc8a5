//! HTTP server: router, page and form handlers, startup.
//!
//! Every form post mutates the caller's session and answers `303 See Other`
//! back to the chat page, which renders the result and drains the queued
//! notices.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State, multipart::Field},
    http::{HeaderValue, StatusCode, Uri, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::{TypedHeader, headers::Cookie};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::backend::DocumentBackend;
use crate::chat::{ChatMode, PendingRequest, SendOutcome, Settled};
use crate::config::AppConfig;
use crate::domain::{ChatSession, StagedFile};
use crate::session::Session;
use crate::ui::pages;

/// Name of the cookie carrying the session ID.
pub const SESSION_COOKIE: &str = "langrag_session";

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_request_bytes;
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(index_handler))
        .route("/chat", get(chat_handler))
        .route("/chat/send", post(send_handler))
        .route(
            "/chat/files",
            post(stage_files_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/chat/files/{index}/remove", post(remove_file_handler))
        .route("/api/session", get(api_session))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(
    config: Arc<AppConfig>,
    backend: Arc<dyn DocumentBackend>,
) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config), backend);

    let sweeper = state
        .sessions
        .spawn_sweeper(config.session.idle_timeout(), config.session.sweep_interval());

    let app = build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        api_url = %config.backend.resolved_api_url(),
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    info!("Received Ctrl-C, shutting down");
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// The caller's session and whether it was created by this request.
struct BrowserSession {
    session: Session,
    created: bool,
}

impl BrowserSession {
    fn resolve(state: &AppState, cookies: Option<&TypedHeader<Cookie>>) -> Self {
        let id = cookies.and_then(|c| c.get(SESSION_COOKIE));
        let (session, created) = state.sessions.resolve(id);
        if created {
            tracing::debug!(session_id = %session.id(), "Created session");
        }
        Self { session, created }
    }

    /// Attach the session cookie when the session is new.
    fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.created {
            let cookie = format!(
                "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/",
                self.session.id()
            );
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::error!(error = %e, "Invalid session cookie"),
            }
        }
        response
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Query string of the chat routes.
#[derive(Debug, Default, Deserialize)]
struct ModeQuery {
    #[serde(default)]
    upload: Option<String>,
}

impl ModeQuery {
    fn mode(&self) -> ChatMode {
        ChatMode::from_upload_flag(self.upload.as_deref() == Some("true"))
    }
}

/// GET / - Landing page.
async fn index_handler() -> Html<String> {
    Html(pages::index_page())
}

/// GET /chat - Chat page, upload panel when `?upload=true`.
async fn chat_handler(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    Query(query): Query<ModeQuery>,
) -> Response {
    let browser = BrowserSession::resolve(&state, cookies.as_ref());
    let mode = query.mode();

    let html = browser.session.with_interface(|chat| {
        let notices = chat.take_notices();
        pages::chat_page(chat, mode, &notices)
    });

    browser.respond(Html(html))
}

/// Fallback - 404 page.
async fn not_found_handler(uri: Uri) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(pages::not_found_page(uri.path())),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Form Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Body of the send form. Absent in upload mode, where the textarea is disabled.
#[derive(Debug, Default, Deserialize)]
struct SendForm {
    #[serde(default)]
    message: String,
}

/// POST /chat/send - Send a chat message, or process staged documents.
async fn send_handler(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    Query(query): Query<ModeQuery>,
    Form(form): Form<SendForm>,
) -> Response {
    let browser = BrowserSession::resolve(&state, cookies.as_ref());
    let mode = query.mode();

    let pending = browser.session.with_interface(|chat| {
        if !mode.is_upload() {
            chat.set_input(form.message);
        }
        chat.begin_send(mode)
    });

    let outcome = match pending {
        Ok(pending) => run_to_completion(&state, &browser.session, mode, pending).await,
        Err(reason) => SendOutcome::Rejected(reason),
    };

    tracing::debug!(
        session_id = %browser.session.id(),
        ?mode,
        ?outcome,
        "Send finished"
    );

    browser.respond(Redirect::to(outcome.next_mode(mode).page_path()))
}

/// Dispatch `pending` on its own task and settle it in the session.
///
/// The task outlives this request, so a client that disconnects mid-call
/// still gets its answer (and a cleared loading flag) on the next page load.
async fn run_to_completion(
    state: &AppState,
    session: &Session,
    mode: ChatMode,
    pending: PendingRequest,
) -> SendOutcome {
    let backend = Arc::clone(&state.backend);
    let task_session = session.clone();
    let task = tokio::spawn(async move {
        let settled = pending.dispatch(backend.as_ref()).await;
        task_session.with_interface(|chat| chat.complete(settled))
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(session_id = %session.id(), error = %e, "Send task failed");
            let settled = Settled::interrupted(mode, e.to_string());
            session.with_interface(|chat| chat.complete(settled))
        }
    }
}

/// POST /chat/files - Stage a batch of files.
async fn stage_files_handler(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let browser = BrowserSession::resolve(&state, cookies.as_ref());
    let cap = state.config.upload.max_file_size;

    let mut batch = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart field: {e}"),
        )
    })? {
        if let Some(file) = read_file_field(field, cap).await? {
            batch.push(file);
        }
    }

    // Outcome is reported through the session's notices.
    let _ = browser.session.with_interface(|chat| chat.stage_files(batch));

    Ok(browser.respond(Redirect::to(ChatMode::Upload.page_path())))
}

/// Read one file part. Parts without a file name (including the empty part
/// browsers send when nothing was picked) are skipped.
///
/// Content beyond `cap` bytes is not retained; the full size is still counted
/// so validation can reject the file.
async fn read_file_field(
    mut field: Field<'_>,
    cap: u64,
) -> Result<Option<StagedFile>, (StatusCode, String)> {
    let Some(name) = field
        .file_name()
        .map(str::to_string)
        .filter(|n| !n.is_empty())
    else {
        return Ok(None);
    };
    let media_type = field.content_type().map(str::to_string);

    let mut size: u64 = 0;
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read file '{name}': {e}"),
        )
    })? {
        size += chunk.len() as u64;
        if size <= cap {
            data.extend_from_slice(&chunk);
        } else if !data.is_empty() {
            data = Vec::new();
        }
    }

    Ok(Some(StagedFile::new(name, media_type, Bytes::from(data), size)))
}

/// POST /chat/files/{index}/remove - Remove a staged file.
async fn remove_file_handler(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    Path(index): Path<usize>,
) -> Response {
    let browser = BrowserSession::resolve(&state, cookies.as_ref());
    let removed = browser
        .session
        .with_interface(|chat| chat.remove_file(index));
    if removed.is_none() {
        tracing::debug!(index, "No staged file at index");
    }
    browser.respond(Redirect::to(ChatMode::Upload.page_path()))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/session - Snapshot of the caller's conversation.
///
/// Only reads existing sessions; a missing or unknown cookie is a 404.
async fn api_session(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
) -> Result<Json<ChatSession>, (StatusCode, String)> {
    let session = cookies
        .as_ref()
        .and_then(|c| c.get(SESSION_COOKIE))
        .and_then(|id| state.sessions.get(id))
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No active session".to_string()))?;
    Ok(Json(session.snapshot()))
}
